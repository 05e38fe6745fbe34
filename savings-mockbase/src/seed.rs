//! Seed dataset — three scenario accounts and everything they own
//!
//! | Scenario | Account | Data |
//! |---|---|---|
//! | new user | `new-user@test.com` | profile only, KYC pending |
//! | active user | `active-user@test.com` | 3 goals, 9 deposits, 1 challenge, 2 referrals |
//! | power user | `power-user@test.com` | 5 goals (2 completed), 35 deposits, 3 referrals, 20 lottery entries |
//!
//! Timestamps are relative to the generation instant; everything else,
//! including lottery entry numbers, is fixed.

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::schema::*;
use crate::store::TableSet;

const ENTRY_RNG_SEED: u64 = 0x5EED_0001;
const ENTRY_ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

pub const NEW_USER_ID: &str = "new-user-001";
pub const ACTIVE_USER_ID: &str = "active-user-001";
pub const POWER_USER_ID: &str = "power-user-001";

/// Which of the three seeded personas an account represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Scenario {
    NewUser,
    ActiveUser,
    PowerUser,
}

impl Scenario {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NewUser => "new-user",
            Self::ActiveUser => "active-user",
            Self::PowerUser => "power-user",
        }
    }
}

impl std::fmt::Display for Scenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fixed email/password/profile-id triple accepted by password sign-in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScenarioAccount {
    pub email: &'static str,
    pub password: &'static str,
    pub user_id: &'static str,
    pub scenario: Scenario,
}

pub const TEST_CREDENTIALS: [ScenarioAccount; 3] = [
    ScenarioAccount {
        email: "new-user@test.com",
        password: "password123",
        user_id: NEW_USER_ID,
        scenario: Scenario::NewUser,
    },
    ScenarioAccount {
        email: "active-user@test.com",
        password: "password123",
        user_id: ACTIVE_USER_ID,
        scenario: Scenario::ActiveUser,
    },
    ScenarioAccount {
        email: "power-user@test.com",
        password: "password123",
        user_id: POWER_USER_ID,
        scenario: Scenario::PowerUser,
    },
];

/// Typed seed rows for every table
#[derive(Debug, Clone, PartialEq)]
pub struct SeedData {
    pub users: Vec<UserProfile>,
    pub goals: Vec<Goal>,
    pub transactions: Vec<Transaction>,
    pub challenges: Vec<Challenge>,
    pub participants: Vec<ChallengeParticipant>,
    pub referrals: Vec<Referral>,
    pub lottery_entries: Vec<LotteryEntry>,
    pub notifications: Vec<Notification>,
}

impl SeedData {
    /// Generate the dataset relative to the current time
    pub fn generate() -> Self {
        Self::generate_at(Utc::now())
    }

    /// Generate the dataset relative to `now`; identical input gives identical output
    pub fn generate_at(now: DateTime<Utc>) -> Self {
        let clock = SeedClock(now);
        let users = users(&clock);
        let goals = goals(&clock);
        let transactions = transactions(&clock, &goals);
        let challenges = challenges(&clock);
        let participants = participants(&clock, &challenges);
        let referrals = referrals(&clock);
        let lottery_entries = lottery_entries(&clock);
        let notifications = notifications(&clock);

        Self {
            users,
            goals,
            transactions,
            challenges,
            participants,
            referrals,
            lottery_entries,
            notifications,
        }
    }

    /// Convert to the store's table set, in [`ALL_TABLES`] order
    pub fn to_tables(&self) -> Result<TableSet> {
        let mut tables = TableSet::new();
        tables.insert(TABLE_USER_PROFILES.into(), to_rows(&self.users)?);
        tables.insert(TABLE_GOALS.into(), to_rows(&self.goals)?);
        tables.insert(TABLE_TRANSACTIONS.into(), to_rows(&self.transactions)?);
        tables.insert(TABLE_CHALLENGES.into(), to_rows(&self.challenges)?);
        tables.insert(TABLE_CHALLENGE_PARTICIPANTS.into(), to_rows(&self.participants)?);
        tables.insert(TABLE_REFERRALS.into(), to_rows(&self.referrals)?);
        tables.insert(TABLE_LOTTERY_ENTRIES.into(), to_rows(&self.lottery_entries)?);
        tables.insert(TABLE_NOTIFICATIONS.into(), to_rows(&self.notifications)?);
        Ok(tables)
    }
}

fn to_rows<T: Serialize>(items: &[T]) -> Result<Vec<crate::filter::Record>> {
    items.iter().map(to_record).collect()
}

struct SeedClock(DateTime<Utc>);

impl SeedClock {
    fn days_ago(&self, days: i64) -> String {
        iso(self.0 - Duration::days(days))
    }

    fn days_from_now(&self, days: i64) -> String {
        iso(self.0 + Duration::days(days))
    }
}

fn iso(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Millis, true)
}

// ─── Generators ───

fn users(c: &SeedClock) -> Vec<UserProfile> {
    let profile = |id: &str, email: &str, name: &str, referral: &str| UserProfile {
        id: id.into(),
        email: email.into(),
        full_name: name.into(),
        phone_number: None,
        total_balance: 0.0,
        total_saved: 0.0,
        lottery_entries: 0,
        referral_code: referral.into(),
        referred_by: None,
        kyc_status: KycStatus::Pending,
        kyc_document_url: None,
        kyc_id_number: None,
        kyc_address: None,
        created_at: c.days_ago(1),
        updated_at: c.days_ago(1),
    };

    vec![
        profile(NEW_USER_ID, "new-user@test.com", "New User", "NEWUSER001"),
        UserProfile {
            phone_number: Some("+254712345678".into()),
            total_balance: 5000.0,
            total_saved: 12000.0,
            lottery_entries: 5,
            kyc_status: KycStatus::Approved,
            kyc_document_url: Some("https://example.com/kyc/active-user.pdf".into()),
            kyc_id_number: Some("12345678".into()),
            kyc_address: Some("123 Main St, Nairobi".into()),
            created_at: c.days_ago(90),
            ..profile(ACTIVE_USER_ID, "active-user@test.com", "Active User", "ACTIVE001")
        },
        UserProfile {
            phone_number: Some("+254787654321".into()),
            total_balance: 15000.0,
            total_saved: 45000.0,
            lottery_entries: 20,
            kyc_status: KycStatus::Approved,
            kyc_document_url: Some("https://example.com/kyc/power-user.pdf".into()),
            kyc_id_number: Some("87654321".into()),
            kyc_address: Some("456 Elite Ave, Nairobi".into()),
            created_at: c.days_ago(180),
            ..profile(POWER_USER_ID, "power-user@test.com", "Power User", "POWER001")
        },
    ]
}

fn goals(c: &SeedClock) -> Vec<Goal> {
    struct GoalSeed {
        id: &'static str,
        user: &'static str,
        title: &'static str,
        target: f64,
        current: f64,
        deadline: i64,
        icon: &'static str,
        color: &'static str,
        auto_save: Option<(f64, AutoSaveFrequency)>,
        completed: bool,
        created: i64,
        updated: i64,
    }

    use AutoSaveFrequency::{Monthly, Weekly};
    let rows = [
        GoalSeed { id: "goal-001", user: ACTIVE_USER_ID, title: "Emergency Fund", target: 10000.0, current: 2500.0, deadline: 60, icon: "🏥", color: "#EF4444", auto_save: Some((500.0, Weekly)), completed: false, created: 30, updated: 1 },
        GoalSeed { id: "goal-002", user: ACTIVE_USER_ID, title: "Vacation", target: 20000.0, current: 12000.0, deadline: 90, icon: "✈️", color: "#3B82F6", auto_save: None, completed: false, created: 60, updated: 2 },
        GoalSeed { id: "goal-003", user: ACTIVE_USER_ID, title: "New Laptop", target: 50000.0, current: 45000.0, deadline: 30, icon: "💻", color: "#8B5CF6", auto_save: Some((1000.0, Monthly)), completed: false, created: 120, updated: 3 },
        GoalSeed { id: "goal-004", user: POWER_USER_ID, title: "House Down Payment", target: 500000.0, current: 150000.0, deadline: 365, icon: "🏠", color: "#10B981", auto_save: Some((5000.0, Monthly)), completed: false, created: 180, updated: 1 },
        GoalSeed { id: "goal-005", user: POWER_USER_ID, title: "Car Fund", target: 200000.0, current: 80000.0, deadline: 180, icon: "🚗", color: "#F59E0B", auto_save: Some((3000.0, Monthly)), completed: false, created: 150, updated: 2 },
        GoalSeed { id: "goal-006", user: POWER_USER_ID, title: "Wedding", target: 100000.0, current: 100000.0, deadline: -30, icon: "💍", color: "#EC4899", auto_save: None, completed: true, created: 240, updated: 30 },
        GoalSeed { id: "goal-007", user: POWER_USER_ID, title: "Business Investment", target: 300000.0, current: 300000.0, deadline: -60, icon: "💼", color: "#6366F1", auto_save: None, completed: true, created: 300, updated: 60 },
        GoalSeed { id: "goal-008", user: POWER_USER_ID, title: "Education Fund", target: 150000.0, current: 75000.0, deadline: 270, icon: "🎓", color: "#14B8A6", auto_save: Some((2000.0, Monthly)), completed: false, created: 90, updated: 1 },
    ];

    rows
        .into_iter()
        .map(|s| Goal {
            id: s.id.into(),
            user_id: s.user.into(),
            title: s.title.into(),
            target_amount: s.target,
            current_amount: s.current,
            deadline: c.days_from_now(s.deadline),
            icon: s.icon.into(),
            color: s.color.into(),
            auto_save_enabled: s.auto_save.is_some(),
            auto_save_amount: s.auto_save.map(|(amount, _)| amount),
            auto_save_frequency: s.auto_save.map(|(_, freq)| freq),
            status: if s.completed { GoalStatus::Completed } else { GoalStatus::Active },
            created_at: c.days_ago(s.created),
            updated_at: c.days_ago(s.updated),
        })
        .collect()
}

fn transactions(c: &SeedClock, goals: &[Goal]) -> Vec<Transaction> {
    let mut txns: Vec<Transaction> = Vec::new();
    let deposit = |txns: &mut Vec<Transaction>, goal: &Goal, amount: f64, days_ago: i64| {
        let id = format!("txn-{}", txns.len() + 1);
        txns.push(Transaction {
            id,
            user_id: goal.user_id.clone(),
            goal_id: Some(goal.id.clone()),
            amount,
            kind: TransactionKind::Deposit,
            description: format!("Deposit to {}", goal.title),
            status: TransactionStatus::Completed,
            created_at: c.days_ago(days_ago),
        });
    };

    for goal in goals.iter().filter(|g| g.user_id == ACTIVE_USER_ID) {
        for i in 0..3 {
            deposit(&mut txns, goal, 1000.0 + i as f64 * 500.0, 30 - i * 10);
        }
    }

    for goal in goals.iter().filter(|g| g.user_id == POWER_USER_ID) {
        let count = if goal.status == GoalStatus::Completed { 10 } else { 5 };
        for i in 0..count {
            deposit(&mut txns, goal, 2000.0 + i as f64 * 1000.0, 150 - i * 15);
        }
    }

    txns
}

fn challenges(c: &SeedClock) -> Vec<Challenge> {
    vec![
        Challenge {
            id: "challenge-001".into(),
            title: "30-Day Savings Sprint".into(),
            description: "Save KES 5,000 in 30 days and earn 10 lottery entries!".into(),
            target_amount: 5000.0,
            duration_days: 30,
            reward_entries: 10,
            start_date: c.days_ago(15),
            end_date: c.days_from_now(15),
            status: ChallengeStatus::Active,
            created_at: c.days_ago(20),
        },
        Challenge {
            id: "challenge-002".into(),
            title: "Weekend Warrior".into(),
            description: "Save KES 2,000 every weekend for a month".into(),
            target_amount: 8000.0,
            duration_days: 28,
            reward_entries: 15,
            start_date: c.days_from_now(7),
            end_date: c.days_from_now(35),
            status: ChallengeStatus::Upcoming,
            created_at: c.days_ago(5),
        },
        Challenge {
            id: "challenge-003".into(),
            title: "New Year Boost".into(),
            description: "Kickstart your savings with KES 10,000 in January".into(),
            target_amount: 10000.0,
            duration_days: 31,
            reward_entries: 20,
            start_date: c.days_ago(60),
            end_date: c.days_ago(29),
            status: ChallengeStatus::Completed,
            created_at: c.days_ago(70),
        },
    ]
}

fn participants(c: &SeedClock, challenges: &[Challenge]) -> Vec<ChallengeParticipant> {
    let sprint = &challenges[0].id;
    let boost = &challenges[2].id;
    vec![
        ChallengeParticipant {
            id: "participant-001".into(),
            challenge_id: sprint.clone(),
            user_id: ACTIVE_USER_ID.into(),
            current_amount: 3000.0,
            status: ParticipantStatus::Active,
            joined_at: c.days_ago(15),
            completed_at: None,
        },
        ChallengeParticipant {
            id: "participant-002".into(),
            challenge_id: sprint.clone(),
            user_id: POWER_USER_ID.into(),
            current_amount: 4500.0,
            status: ParticipantStatus::Active,
            joined_at: c.days_ago(15),
            completed_at: None,
        },
        ChallengeParticipant {
            id: "participant-003".into(),
            challenge_id: boost.clone(),
            user_id: POWER_USER_ID.into(),
            current_amount: 10000.0,
            status: ParticipantStatus::Completed,
            joined_at: c.days_ago(60),
            completed_at: Some(c.days_ago(35)),
        },
    ]
}

fn referrals(c: &SeedClock) -> Vec<Referral> {
    [
        (ACTIVE_USER_ID, true, 60),
        (ACTIVE_USER_ID, false, 30),
        (POWER_USER_ID, true, 120),
        (POWER_USER_ID, true, 90),
        (POWER_USER_ID, true, 60),
    ]
    .into_iter()
    .enumerate()
    .map(|(i, (referrer, claimed, days))| Referral {
        id: format!("referral-{:03}", i + 1),
        referrer_id: referrer.into(),
        referred_id: format!("referred-user-{:03}", i + 1),
        reward_claimed: claimed,
        created_at: c.days_ago(days),
    })
    .collect()
}

fn lottery_entries(c: &SeedClock) -> Vec<LotteryEntry> {
    let mut rng = StdRng::seed_from_u64(ENTRY_RNG_SEED);
    let mut entry_number = move || -> String {
        let code: String = (0..9)
            .map(|_| ENTRY_ALPHABET[rng.random_range(0..ENTRY_ALPHABET.len())] as char)
            .collect();
        format!("ENTRY-{code}")
    };

    let mut entries = Vec::new();
    for i in 0..5 {
        entries.push(LotteryEntry {
            id: format!("lottery-{}", entries.len() + 1),
            user_id: ACTIVE_USER_ID.into(),
            entry_number: entry_number(),
            draw_date: c.days_from_now(30),
            status: LotteryStatus::Pending,
            created_at: c.days_ago(10 - i * 2),
        });
    }

    for i in 0..20 {
        // Entries 15..18 are past draws that lost; the last two await the next draw
        let status = if (15..18).contains(&i) { LotteryStatus::Lost } else { LotteryStatus::Pending };
        entries.push(LotteryEntry {
            id: format!("lottery-{}", entries.len() + 1),
            user_id: POWER_USER_ID.into(),
            entry_number: entry_number(),
            draw_date: if i < 18 { c.days_ago(30 - i) } else { c.days_from_now(30) },
            status,
            created_at: c.days_ago(60 - i * 3),
        });
    }

    entries
}

fn notifications(c: &SeedClock) -> Vec<Notification> {
    use NotificationKind as K;
    let table = [
        ("notif-001", ACTIVE_USER_ID, "Goal Progress", "You are 90% towards your New Laptop goal!", K::Info, false, Some("/goals/goal-003"), 1),
        ("notif-002", ACTIVE_USER_ID, "Challenge Update", "You are 60% through the 30-Day Savings Sprint!", K::Challenge, false, Some("/challenges/challenge-001"), 2),
        ("notif-003", ACTIVE_USER_ID, "Auto-save Successful", "KES 500 has been saved to your Emergency Fund", K::Success, true, None, 7),
        ("notif-004", POWER_USER_ID, "Challenge Completed!", "Congratulations! You completed the New Year Boost challenge and earned 20 lottery entries!", K::Achievement, true, Some("/rewards"), 35),
        ("notif-005", POWER_USER_ID, "Goal Achieved", "You reached your Wedding goal! Time to celebrate!", K::Achievement, true, Some("/goals/goal-006"), 30),
        ("notif-006", POWER_USER_ID, "Lottery Draw Soon", "The next lottery draw is in 7 days. You have 20 entries!", K::Info, false, Some("/rewards"), 1),
    ];

    table
        .into_iter()
        .map(|(id, user, title, message, kind, is_read, action_url, days)| Notification {
            id: id.into(),
            user_id: user.into(),
            title: title.into(),
            message: message.into(),
            kind,
            is_read,
            action_url: action_url.map(Into::into),
            created_at: c.days_ago(days),
        })
        .collect()
}
