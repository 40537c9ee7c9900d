use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::{LamportAmount, ValidationError, INITIAL_STATUS, RESOLVED_STATUS};

/// Lifecycle of a bet.
///
/// `PreparedLock` is written on insert (wager locked, no outcome yet);
/// `PreparedResolve` once the resolver has recorded roll and payout.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BetStatus {
    PreparedLock,
    PreparedResolve,
}

impl BetStatus {
    pub const INITIAL: BetStatus = BetStatus::PreparedLock;

    /// Status a successful resolution writes.
    pub const RESOLVED: BetStatus = BetStatus::PreparedResolve;

    pub const ALL: [BetStatus; 2] = [BetStatus::PreparedLock, BetStatus::PreparedResolve];

    /// Transition table. Statuses only move forward; a row that has left
    /// `PreparedLock` is never revisited.
    pub fn can_transition_to(&self, next: BetStatus) -> bool {
        matches!(
            (self, next),
            (BetStatus::PreparedLock, BetStatus::PreparedResolve)
        )
    }

    /// Every status the transition table allows to move to `next`.
    /// Stores use this as the guard of their conditional writes.
    pub fn sources_of(next: BetStatus) -> Vec<BetStatus> {
        Self::ALL
            .into_iter()
            .filter(|status| status.can_transition_to(next))
            .collect()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BetStatus::PreparedLock => INITIAL_STATUS,
            BetStatus::PreparedResolve => RESOLVED_STATUS,
        }
    }
}

impl std::fmt::Display for BetStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the `bets` table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Bet {
    pub id: i64,
    pub player: String,
    pub amount: LamportAmount,
    pub bet_type: i16,
    pub target: i32,
    pub roll: i32,
    pub payout: LamportAmount,
    pub nonce: u64,
    pub expiry: u64,
    pub signature_ref: String,
    pub status: BetStatus,
    pub game: String,
    pub created_at: DateTime<Utc>,
}

impl Bet {
    pub fn is_expired_at(&self, now_unix: u64) -> bool {
        now_unix > self.expiry
    }
}

/// Input to [`crate::repository::LedgerStore::insert`].
///
/// `status` and `game` are optional; the store fills them in so every
/// caller sees the same defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBet {
    pub player: String,
    pub amount: LamportAmount,
    pub bet_type: i16,
    pub target: i32,
    pub nonce: u64,
    pub expiry: u64,
    pub signature_ref: String,
    pub status: Option<BetStatus>,
    pub game: Option<String>,
}

impl NewBet {
    pub fn status_or_default(&self) -> BetStatus {
        self.status.unwrap_or(BetStatus::INITIAL)
    }

    /// Empty game tags count as absent.
    pub fn game_or<'a>(&'a self, default_game: &'a str) -> &'a str {
        match self.game.as_deref() {
            Some(game) if !game.is_empty() => game,
            _ => default_game,
        }
    }
}

/// Integer as it arrives from an external caller: a JSON number or a
/// decimal string (large nonces are commonly sent as strings).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireInteger {
    Number(serde_json::Number),
    Text(String),
}

impl WireInteger {
    /// Parse as a non-negative 64-bit integer without going through floats.
    pub fn to_u64(&self, field: &'static str) -> Result<u64, ValidationError> {
        match self {
            WireInteger::Number(n) => {
                if let Some(value) = n.as_u64() {
                    Ok(value)
                } else if n.as_i64().is_some() {
                    Err(ValidationError::Negative {
                        field,
                        value: n.to_string(),
                    })
                } else {
                    parse_decimal_u64(field, &n.to_string())
                }
            }
            WireInteger::Text(text) => parse_decimal_u64(field, text.trim()),
        }
    }
}

fn parse_decimal_u64(field: &'static str, text: &str) -> Result<u64, ValidationError> {
    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());

    if let Some(magnitude) = text.strip_prefix('-') {
        if !all_digits(magnitude) {
            return Err(ValidationError::NotAnInteger {
                field,
                value: text.to_string(),
            });
        }
        if magnitude.bytes().all(|b| b == b'0') {
            return Ok(0);
        }
        return Err(ValidationError::Negative {
            field,
            value: text.to_string(),
        });
    }

    if !all_digits(text) {
        return Err(ValidationError::NotAnInteger {
            field,
            value: text.to_string(),
        });
    }

    text.parse::<u64>().map_err(|_| ValidationError::OutOfRange {
        field,
        value: text.to_string(),
    })
}

impl From<u64> for WireInteger {
    fn from(value: u64) -> Self {
        WireInteger::Number(value.into())
    }
}

impl From<i64> for WireInteger {
    fn from(value: i64) -> Self {
        WireInteger::Number(value.into())
    }
}

impl From<&str> for WireInteger {
    fn from(value: &str) -> Self {
        WireInteger::Text(value.to_string())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordBetRequest {
    pub player: String,
    pub amount: WireInteger,
    pub bet_type: i16,
    pub target: i32,
    pub nonce: WireInteger,
    pub expiry: WireInteger,
    #[serde(default, alias = "signature_base58")]
    pub signature_ref: Option<String>,
    #[serde(default)]
    pub game: Option<String>,
}

impl RecordBetRequest {
    /// Validate and turn into an insert in the initial lifecycle state.
    pub fn into_new_bet(self) -> Result<NewBet, ValidationError> {
        if self.player.trim().is_empty() {
            return Err(ValidationError::EmptyField { field: "player" });
        }

        Ok(NewBet {
            amount: LamportAmount::new(self.amount.to_u64("amount")?),
            nonce: self.nonce.to_u64("nonce")?,
            expiry: self.expiry.to_u64("expiry")?,
            player: self.player,
            bet_type: self.bet_type,
            target: self.target,
            signature_ref: self.signature_ref.unwrap_or_default(),
            status: Some(BetStatus::INITIAL),
            game: self.game,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolveBetRequest {
    pub nonce: WireInteger,
    pub roll: i32,
    pub payout: WireInteger,
}

impl ResolveBetRequest {
    pub fn validate(&self) -> Result<(u64, i32, LamportAmount), ValidationError> {
        Ok((
            self.nonce.to_u64("nonce")?,
            self.roll,
            LamportAmount::new(self.payout.to_u64("payout")?),
        ))
    }
}

/// Result of a resolution attempt. Only `Applied` changed the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolveOutcome {
    Applied,
    /// Already resolved, or no bet with that nonce. Safe to retry.
    NoOp,
    /// The bet's expiry passed before resolution was attempted; nothing written.
    Expired,
}

impl ResolveOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, ResolveOutcome::Applied)
    }
}

/// Latest row of `game_rules`. Everything but `id` is opaque to the ledger.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RuleSet {
    pub id: i64,
    pub fields: serde_json::Map<String, serde_json::Value>,
}

impl RuleSet {
    /// Build from a whole row rendered as JSON (`to_jsonb(row)`).
    pub fn from_row_json(id: i64, row: serde_json::Value) -> Self {
        let mut fields = match row {
            serde_json::Value::Object(map) => map,
            _ => serde_json::Map::new(),
        };
        fields.remove("id");
        Self { id, fields }
    }

    pub fn field<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.fields
            .get(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Won,
    Lost,
}

impl Outcome {
    pub fn from_payout(payout: LamportAmount) -> Self {
        if payout.is_zero() {
            Outcome::Lost
        } else {
            Outcome::Won
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Won => "won",
            Outcome::Lost => "lost",
        }
    }

    pub fn sign(&self) -> char {
        match self {
            Outcome::Won => '+',
            Outcome::Lost => '-',
        }
    }
}

/// One line of the dashboard activity feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEntry {
    pub player: String,
    pub game: String,
    pub outcome_label: Outcome,
    pub signed_amount_text: String,
    pub time_of_day: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub total_users: u64,
    pub active_games: u64,
    #[serde(serialize_with = "decimal_string")]
    pub total_volume: u128,
    #[serde(serialize_with = "decimal_string")]
    pub windowed_revenue: i128,
    pub recent_activity: Vec<ActivityEntry>,
}

// JSON consumers commonly parse numbers as doubles; sums go out as text.
fn decimal_string<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    T: std::fmt::Display,
    S: serde::Serializer,
{
    serializer.collect_str(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_table() {
        assert!(BetStatus::PreparedLock.can_transition_to(BetStatus::PreparedResolve));
        assert!(!BetStatus::PreparedResolve.can_transition_to(BetStatus::PreparedLock));
        assert!(!BetStatus::PreparedResolve.can_transition_to(BetStatus::PreparedResolve));
        assert!(!BetStatus::PreparedLock.can_transition_to(BetStatus::PreparedLock));
    }

    #[test]
    fn test_resolution_sources_follow_transition_table() {
        assert_eq!(
            BetStatus::sources_of(BetStatus::RESOLVED),
            vec![BetStatus::PreparedLock]
        );
        assert!(BetStatus::sources_of(BetStatus::INITIAL).is_empty());
    }

    #[test]
    fn test_wire_integer_accepts_numbers_and_strings() {
        assert_eq!(WireInteger::from(42u64).to_u64("amount"), Ok(42));
        assert_eq!(
            WireInteger::from("18446744073709551615").to_u64("nonce"),
            Ok(u64::MAX)
        );
        assert_eq!(WireInteger::from(" 7 ").to_u64("expiry"), Ok(7));
        assert_eq!(WireInteger::from("-0").to_u64("amount"), Ok(0));
    }

    #[test]
    fn test_wire_integer_rejects_negative() {
        assert!(matches!(
            WireInteger::from(-5i64).to_u64("amount"),
            Err(ValidationError::Negative { field: "amount", .. })
        ));
        assert!(matches!(
            WireInteger::from("-12").to_u64("nonce"),
            Err(ValidationError::Negative { field: "nonce", .. })
        ));
    }

    #[test]
    fn test_wire_integer_rejects_non_integers() {
        let fractional: WireInteger = serde_json::from_str("1.5").unwrap();
        assert!(matches!(
            fractional.to_u64("amount"),
            Err(ValidationError::NotAnInteger { .. })
        ));
        assert!(matches!(
            WireInteger::from("12abc").to_u64("amount"),
            Err(ValidationError::NotAnInteger { .. })
        ));
        assert!(matches!(
            WireInteger::from("").to_u64("amount"),
            Err(ValidationError::NotAnInteger { .. })
        ));
        assert!(matches!(
            WireInteger::from("18446744073709551616").to_u64("nonce"),
            Err(ValidationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_record_request_from_json() {
        let request: RecordBetRequest = serde_json::from_value(serde_json::json!({
            "player": "player-1",
            "amount": 1_000_000_000u64,
            "betType": 0,
            "target": 50,
            "nonce": "9007199254740993",
            "expiry": 1_700_000_000u64,
            "signature_base58": "5ig",
        }))
        .unwrap();

        let bet = request.into_new_bet().unwrap();
        assert_eq!(bet.nonce, 9_007_199_254_740_993);
        assert_eq!(bet.amount, LamportAmount::new(1_000_000_000));
        assert_eq!(bet.signature_ref, "5ig");
        assert_eq!(bet.status, Some(BetStatus::PreparedLock));
        assert_eq!(bet.game, None);
    }

    #[test]
    fn test_record_request_requires_player() {
        let request = RecordBetRequest {
            player: "  ".to_string(),
            amount: 1u64.into(),
            bet_type: 0,
            target: 1,
            nonce: 1u64.into(),
            expiry: 1u64.into(),
            signature_ref: None,
            game: None,
        };
        assert_eq!(
            request.into_new_bet(),
            Err(ValidationError::EmptyField { field: "player" })
        );
    }

    #[test]
    fn test_game_defaulting() {
        let mut bet = NewBet {
            player: "p".to_string(),
            amount: LamportAmount::ZERO,
            bet_type: 0,
            target: 0,
            nonce: 1,
            expiry: 1,
            signature_ref: String::new(),
            status: None,
            game: None,
        };
        assert_eq!(bet.game_or("dice"), "dice");
        assert_eq!(bet.status_or_default(), BetStatus::PreparedLock);

        bet.game = Some(String::new());
        assert_eq!(bet.game_or("dice"), "dice");

        bet.game = Some("coinflip".to_string());
        assert_eq!(bet.game_or("dice"), "coinflip");
    }

    #[test]
    fn test_rule_set_from_row_json() {
        let rules = RuleSet::from_row_json(
            3,
            serde_json::json!({ "id": 3, "house_edge_bps": 150, "name": "v3" }),
        );
        assert_eq!(rules.id, 3);
        assert!(!rules.fields.contains_key("id"));
        assert_eq!(rules.field::<u32>("house_edge_bps"), Some(150));
        assert_eq!(rules.field::<String>("missing"), None);
    }

    #[test]
    fn test_snapshot_serializes_sums_as_text() {
        let snapshot = DashboardSnapshot {
            total_users: 2,
            active_games: 1,
            total_volume: 18_446_744_073_709_551_616,
            windowed_revenue: -5,
            recent_activity: Vec::new(),
        };
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["totalVolume"], "18446744073709551616");
        assert_eq!(json["windowedRevenue"], "-5");
        assert_eq!(json["totalUsers"], 2);
    }
}
