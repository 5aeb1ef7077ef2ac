use chrono::{DateTime, Utc};
use diesel::{AsChangeset, Insertable, Queryable};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use validator::Validate;

pub const MAX_WICKETS: i32 = 10;

#[derive(Serialize, Deserialize, Debug, Clone, Queryable, Insertable, AsChangeset)]
#[diesel(table_name = crate::model::schema::matches)]
#[diesel(primary_key(match_id))]
pub struct CricketMatch {
    #[serde(rename = "matchId")]
    pub match_id: String,
    #[serde(rename = "matchNumber")]
    pub match_number: i32,
    pub round: String,
    #[serde(rename = "team1Id")]
    pub team1_id: String,
    #[serde(rename = "team2Id")]
    pub team2_id: String,
    pub venue: Option<String>,
    #[serde(rename = "scheduledAt")]
    pub scheduled_at: DateTime<Utc>,
    pub status: String,
    #[serde(rename = "tossWinnerId")]
    pub toss_winner_id: Option<String>,
    #[serde(rename = "tossDecision")]
    pub toss_decision: Option<String>,
    #[serde(rename = "battingFirstId")]
    pub batting_first_id: Option<String>,
    #[serde(rename = "team1Runs")]
    pub team1_runs: Option<i32>,
    #[serde(rename = "team1Wickets")]
    pub team1_wickets: Option<i32>,
    #[serde(rename = "team2Runs")]
    pub team2_runs: Option<i32>,
    #[serde(rename = "team2Wickets")]
    pub team2_wickets: Option<i32>,
    #[serde(rename = "winnerId")]
    pub winner_id: Option<String>,
    pub margin: Option<i32>,
    #[serde(rename = "marginType")]
    pub margin_type: Option<String>,
    #[serde(rename = "startedAt")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(rename = "finishedAt")]
    pub finished_at: Option<DateTime<Utc>>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Scheduled,
    Live,
    FirstInningsComplete,
    SecondInningsComplete,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchAction {
    Start,
    RecordFirstInnings,
    RecordSecondInnings,
    Finish,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TossDecision {
    Bat,
    Bowl,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarginType {
    Runs,
    Wickets,
    Tie,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Innings {
    pub runs: i32,
    pub wickets: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchOutcome {
    pub winner_id: Option<String>,
    pub margin: i32,
    pub margin_type: MarginType,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum MatchRuleError {
    #[error("cannot {action} a match that is {status}")]
    OutOfOrder { status: MatchStatus, action: MatchAction },
    #[error("toss winner {0} is not playing in this match")]
    TossWinnerNotPlaying(String),
    #[error("match is missing a recorded innings")]
    MissingInnings,
    #[error("match status '{0}' is not recognised")]
    UnknownStatus(String),
}

impl MatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStatus::Scheduled => "scheduled",
            MatchStatus::Live => "live",
            MatchStatus::FirstInningsComplete => "first_innings_complete",
            MatchStatus::SecondInningsComplete => "second_innings_complete",
            MatchStatus::Completed => "completed",
        }
    }

    pub fn apply(self, action: MatchAction) -> Result<MatchStatus, MatchRuleError> {
        use MatchAction::*;
        use MatchStatus::*;
        match (self, action) {
            (Scheduled, Start) => Ok(Live),
            (Live, RecordFirstInnings) => Ok(FirstInningsComplete),
            (FirstInningsComplete, RecordSecondInnings) => Ok(SecondInningsComplete),
            (SecondInningsComplete, Finish) => Ok(Completed),
            (status, action) => Err(MatchRuleError::OutOfOrder { status, action }),
        }
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str().replace('_', " "))
    }
}

impl FromStr for MatchStatus {
    type Err = MatchRuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scheduled" => Ok(MatchStatus::Scheduled),
            "live" => Ok(MatchStatus::Live),
            "first_innings_complete" => Ok(MatchStatus::FirstInningsComplete),
            "second_innings_complete" => Ok(MatchStatus::SecondInningsComplete),
            "completed" => Ok(MatchStatus::Completed),
            other => Err(MatchRuleError::UnknownStatus(other.to_string())),
        }
    }
}

impl fmt::Display for MatchAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            MatchAction::Start => "start",
            MatchAction::RecordFirstInnings => "record the first innings of",
            MatchAction::RecordSecondInnings => "record the second innings of",
            MatchAction::Finish => "finish",
        };
        f.write_str(verb)
    }
}

impl TossDecision {
    pub fn as_str(&self) -> &'static str {
        match self {
            TossDecision::Bat => "bat",
            TossDecision::Bowl => "bowl",
        }
    }
}

impl MarginType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarginType::Runs => "runs",
            MarginType::Wickets => "wickets",
            MarginType::Tie => "tie",
        }
    }
}

/// Decides the result once both innings are in. The chasing side wins by the
/// wickets it had left, the side batting first wins by the run difference.
pub fn decide_outcome(
    batting_first: &str,
    first: Innings,
    chasing: &str,
    second: Innings,
) -> MatchOutcome {
    if second.runs > first.runs {
        MatchOutcome {
            winner_id: Some(chasing.to_string()),
            margin: MAX_WICKETS - second.wickets,
            margin_type: MarginType::Wickets,
        }
    } else if first.runs > second.runs {
        MatchOutcome {
            winner_id: Some(batting_first.to_string()),
            margin: first.runs - second.runs,
            margin_type: MarginType::Runs,
        }
    } else {
        MatchOutcome {
            winner_id: None,
            margin: 0,
            margin_type: MarginType::Tie,
        }
    }
}

impl CricketMatch {
    pub fn new(schema: ScheduleMatchSchema, now: DateTime<Utc>) -> Self {
        CricketMatch {
            match_id: uuid::Uuid::new_v4().to_string(),
            match_number: schema.match_number,
            round: schema.round.trim().to_string(),
            team1_id: schema.team1_id,
            team2_id: schema.team2_id,
            venue: schema.venue,
            scheduled_at: schema.scheduled_at,
            status: MatchStatus::Scheduled.as_str().to_string(),
            toss_winner_id: None,
            toss_decision: None,
            batting_first_id: None,
            team1_runs: None,
            team1_wickets: None,
            team2_runs: None,
            team2_wickets: None,
            winner_id: None,
            margin: None,
            margin_type: None,
            started_at: None,
            finished_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn status(&self) -> Result<MatchStatus, MatchRuleError> {
        self.status.parse()
    }

    fn advance(&mut self, action: MatchAction, now: DateTime<Utc>) -> Result<(), MatchRuleError> {
        let next = self.status()?.apply(action)?;
        self.status = next.as_str().to_string();
        self.updated_at = now;
        Ok(())
    }

    fn other_team(&self, team_id: &str) -> &str {
        if team_id == self.team1_id {
            &self.team2_id
        } else {
            &self.team1_id
        }
    }

    /// (batting first, chasing) once the toss is recorded.
    pub fn batting_order(&self) -> Option<(&str, &str)> {
        self.batting_first_id
            .as_deref()
            .map(|first| (first, self.other_team(first)))
    }

    pub fn innings_of(&self, team_id: &str) -> Option<Innings> {
        let (runs, wickets) = if team_id == self.team1_id {
            (self.team1_runs, self.team1_wickets)
        } else if team_id == self.team2_id {
            (self.team2_runs, self.team2_wickets)
        } else {
            return None;
        };
        Some(Innings {
            runs: runs?,
            wickets: wickets?,
        })
    }

    fn set_innings(&mut self, team_id: &str, innings: Innings) {
        if team_id == self.team1_id {
            self.team1_runs = Some(innings.runs);
            self.team1_wickets = Some(innings.wickets);
        } else {
            self.team2_runs = Some(innings.runs);
            self.team2_wickets = Some(innings.wickets);
        }
    }

    pub fn start(
        &mut self,
        toss_winner_id: &str,
        decision: TossDecision,
        now: DateTime<Utc>,
    ) -> Result<(), MatchRuleError> {
        if toss_winner_id != self.team1_id && toss_winner_id != self.team2_id {
            return Err(MatchRuleError::TossWinnerNotPlaying(toss_winner_id.to_string()));
        }
        self.advance(MatchAction::Start, now)?;
        let batting_first = match decision {
            TossDecision::Bat => toss_winner_id.to_string(),
            TossDecision::Bowl => self.other_team(toss_winner_id).to_string(),
        };
        self.toss_winner_id = Some(toss_winner_id.to_string());
        self.toss_decision = Some(decision.as_str().to_string());
        self.batting_first_id = Some(batting_first);
        self.started_at = Some(now);
        Ok(())
    }

    pub fn record_first_innings(
        &mut self,
        innings: Innings,
        now: DateTime<Utc>,
    ) -> Result<(), MatchRuleError> {
        self.advance(MatchAction::RecordFirstInnings, now)?;
        let batting_first = self
            .batting_first_id
            .clone()
            .ok_or(MatchRuleError::MissingInnings)?;
        self.set_innings(&batting_first, innings);
        Ok(())
    }

    pub fn record_second_innings(
        &mut self,
        innings: Innings,
        now: DateTime<Utc>,
    ) -> Result<(), MatchRuleError> {
        self.advance(MatchAction::RecordSecondInnings, now)?;
        let chasing = self
            .batting_order()
            .map(|(_, chasing)| chasing.to_string())
            .ok_or(MatchRuleError::MissingInnings)?;
        self.set_innings(&chasing, innings);
        Ok(())
    }

    pub fn finish(&mut self, now: DateTime<Utc>) -> Result<MatchOutcome, MatchRuleError> {
        self.status()?.apply(MatchAction::Finish)?;
        let (first_id, chasing_id) = self.batting_order().ok_or(MatchRuleError::MissingInnings)?;
        let first = self.innings_of(first_id).ok_or(MatchRuleError::MissingInnings)?;
        let second = self.innings_of(chasing_id).ok_or(MatchRuleError::MissingInnings)?;
        let outcome = decide_outcome(first_id, first, chasing_id, second);

        self.advance(MatchAction::Finish, now)?;
        self.winner_id = outcome.winner_id.clone();
        self.margin = Some(outcome.margin);
        self.margin_type = Some(outcome.margin_type.as_str().to_string());
        self.finished_at = Some(now);
        Ok(outcome)
    }
}

#[derive(Debug, Deserialize, Clone, Validate)]
pub struct ScheduleMatchSchema {
    #[serde(rename = "matchNumber")]
    #[validate(range(min = 1, message = "Match number must be positive"))]
    pub match_number: i32,
    #[validate(length(min = 1, max = 50, message = "Round must be between 1 and 50 characters"))]
    pub round: String,
    #[serde(rename = "team1Id")]
    pub team1_id: String,
    #[serde(rename = "team2Id")]
    pub team2_id: String,
    #[validate(length(max = 150, message = "Venue must be at most 150 characters"))]
    pub venue: Option<String>,
    #[serde(rename = "scheduledAt")]
    pub scheduled_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct StartMatchSchema {
    #[serde(rename = "tossWinnerId")]
    pub toss_winner_id: String,
    #[serde(rename = "tossDecision")]
    pub toss_decision: TossDecision,
}

#[derive(Debug, Deserialize, Validate)]
pub struct InningsSchema {
    #[validate(range(min = 0, message = "Runs cannot be negative"))]
    pub runs: i32,
    #[validate(range(min = 0, max = 10, message = "Wickets must be between 0 and 10"))]
    pub wickets: i32,
}

impl From<&InningsSchema> for Innings {
    fn from(schema: &InningsSchema) -> Self {
        Innings {
            runs: schema.runs,
            wickets: schema.wickets,
        }
    }
}
