//! Table names and row contracts for the savings app dataset
//!
//! Rows are stored as open [`Record`]s; the structs here document the field
//! set each table carries and give typed access via [`to_record`] /
//! [`from_record`]. Field names are part of the consumed contract and must
//! stay stable.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{MockbaseError, Result};
use crate::filter::Record;

// ─── Table Names (constants) ───

pub const TABLE_USER_PROFILES: &str = "user_profiles";
pub const TABLE_GOALS: &str = "goals";
pub const TABLE_TRANSACTIONS: &str = "transactions";
pub const TABLE_CHALLENGES: &str = "challenges";
pub const TABLE_CHALLENGE_PARTICIPANTS: &str = "challenge_participants";
pub const TABLE_REFERRALS: &str = "referrals";
pub const TABLE_LOTTERY_ENTRIES: &str = "lottery_entries";
pub const TABLE_NOTIFICATIONS: &str = "notifications";

/// All seeded tables, in seed order
pub const ALL_TABLES: [&str; 8] = [
    TABLE_USER_PROFILES,
    TABLE_GOALS,
    TABLE_TRANSACTIONS,
    TABLE_CHALLENGES,
    TABLE_CHALLENGE_PARTICIPANTS,
    TABLE_REFERRALS,
    TABLE_LOTTERY_ENTRIES,
    TABLE_NOTIFICATIONS,
];

/// Serialize a typed row into a store record
pub fn to_record<T: Serialize>(row: &T) -> Result<Record> {
    match serde_json::to_value(row)? {
        Value::Object(map) => Ok(map),
        other => Err(MockbaseError::Serialization(format!(
            "row serialized to {other}, expected an object"
        ))),
    }
}

/// Decode a store record into a typed row
pub fn from_record<T: DeserializeOwned>(record: &Record) -> Result<T> {
    Ok(serde_json::from_value(Value::Object(record.clone()))?)
}

// ─── Status Enums ───

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KycStatus {
    Pending,
    Submitted,
    Approved,
    Rejected,
}

impl KycStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Submitted => "submitted",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for KycStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalStatus {
    Active,
    Completed,
    Paused,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AutoSaveFrequency {
    Daily,
    Weekly,
    Monthly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Deposit,
    Withdrawal,
    Transfer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    Completed,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChallengeStatus {
    Active,
    Completed,
    Upcoming,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticipantStatus {
    Active,
    Completed,
    Abandoned,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LotteryStatus {
    Pending,
    Won,
    Lost,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Info,
    Success,
    Warning,
    Achievement,
    Challenge,
}

// ─── Rows ───

/// `user_profiles` row — the rich profile behind an authenticated user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub phone_number: Option<String>,
    pub total_balance: f64,
    pub total_saved: f64,
    pub lottery_entries: u32,
    pub referral_code: String,
    pub referred_by: Option<String>,
    pub kyc_status: KycStatus,
    pub kyc_document_url: Option<String>,
    pub kyc_id_number: Option<String>,
    pub kyc_address: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// `goals` row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub target_amount: f64,
    pub current_amount: f64,
    pub deadline: String,
    pub icon: String,
    pub color: String,
    pub auto_save_enabled: bool,
    pub auto_save_amount: Option<f64>,
    pub auto_save_frequency: Option<AutoSaveFrequency>,
    pub status: GoalStatus,
    pub created_at: String,
    pub updated_at: String,
}

/// `transactions` row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub user_id: String,
    pub goal_id: Option<String>,
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub description: String,
    pub status: TransactionStatus,
    pub created_at: String,
}

/// `challenges` row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Challenge {
    pub id: String,
    pub title: String,
    pub description: String,
    pub target_amount: f64,
    pub duration_days: u32,
    pub reward_entries: u32,
    pub start_date: String,
    pub end_date: String,
    pub status: ChallengeStatus,
    pub created_at: String,
}

/// `challenge_participants` row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChallengeParticipant {
    pub id: String,
    pub challenge_id: String,
    pub user_id: String,
    pub current_amount: f64,
    pub status: ParticipantStatus,
    pub joined_at: String,
    pub completed_at: Option<String>,
}

/// `referrals` row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Referral {
    pub id: String,
    pub referrer_id: String,
    pub referred_id: String,
    pub reward_claimed: bool,
    pub created_at: String,
}

/// `lottery_entries` row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LotteryEntry {
    pub id: String,
    pub user_id: String,
    pub entry_number: String,
    pub draw_date: String,
    pub status: LotteryStatus,
    pub created_at: String,
}

/// `notifications` row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub is_read: bool,
    pub action_url: Option<String>,
    pub created_at: String,
}
