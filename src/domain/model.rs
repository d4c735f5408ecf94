use crate::utils::error::{Result, SantaError};
use serde::{Deserialize, Serialize};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;

pub const EMPLOYEE_NAME: &str = "Employee_Name";
pub const EMPLOYEE_EMAIL_ID: &str = "Employee_EmailID";
pub const SECRET_CHILD_NAME: &str = "Secret_Child_Name";
pub const SECRET_CHILD_EMAIL_ID: &str = "Secret_Child_EmailID";
/// Working flag some exports carry along; never written to the output.
pub const ASSIGNED: &str = "Assigned";

/// A header row plus string cells, as read from a CSV file or a sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// 1-based line of each row in the source file, header on line 1.
    pub source_lines: Vec<usize>,
}

impl Table {
    pub fn new(name: impl Into<String>, headers: Vec<String>) -> Self {
        Self {
            name: name.into(),
            headers,
            rows: Vec::new(),
            source_lines: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<String>, source_line: usize) {
        self.rows.push(row);
        self.source_lines.push(source_line);
    }

    /// Line in the source file for `rows[index]`. Rows added without one
    /// are assumed to follow the header with no gaps.
    pub fn source_line(&self, index: usize) -> usize {
        self.source_lines.get(index).copied().unwrap_or(index + 2)
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == column)
    }

    pub fn require_column(&self, column: &str) -> Result<usize> {
        self.column_index(column)
            .ok_or_else(|| SantaError::MissingColumn {
                table: self.name.clone(),
                column: column.to_string(),
            })
    }

    pub fn cell<'a>(&'a self, row: &'a [String], column: usize) -> &'a str {
        row.get(column).map(String::as_str).unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Participant {
    pub id: String,
    pub name: String,
}

/// Participants in roster order, unique by id.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    participants: Vec<Participant>,
    index: HashMap<String, usize>,
}

impl Roster {
    pub fn new(participants: Vec<Participant>) -> Result<Self> {
        let mut index = HashMap::with_capacity(participants.len());
        for (position, participant) in participants.iter().enumerate() {
            match index.entry(participant.id.clone()) {
                Entry::Occupied(_) => {
                    return Err(SantaError::DuplicateParticipant {
                        id: participant.id.clone(),
                    })
                }
                Entry::Vacant(slot) => {
                    slot.insert(position);
                }
            }
        }
        Ok(Self {
            participants,
            index,
        })
    }

    /// Builds the roster from `Employee_Name` / `Employee_EmailID`.
    pub fn from_table(table: &Table) -> Result<Self> {
        let name_col = table.require_column(EMPLOYEE_NAME)?;
        let id_col = table.require_column(EMPLOYEE_EMAIL_ID)?;

        let mut participants = Vec::with_capacity(table.len());
        for (index, row) in table.rows.iter().enumerate() {
            let id = table.cell(row, id_col);
            if id.is_empty() {
                return Err(SantaError::InvalidRecord {
                    table: table.name.clone(),
                    row: table.source_line(index),
                    reason: format!("{} is empty", EMPLOYEE_EMAIL_ID),
                });
            }
            participants.push(Participant {
                id: id.to_string(),
                name: table.cell(row, name_col).to_string(),
            });
        }

        Self::new(participants)
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn get(&self, id: &str) -> Option<&Participant> {
        self.index.get(id).map(|&i| &self.participants[i])
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }
}

/// Giver id to the recipient id they drew last round.
///
/// A giver with an empty recipient cell is still known; they simply have
/// nobody to exclude.
#[derive(Debug, Clone, Default)]
pub struct PriorRound {
    recipients: HashMap<String, Option<String>>,
}

impl PriorRound {
    pub fn insert(&mut self, giver: impl Into<String>, recipient: Option<String>) {
        self.recipients.entry(giver.into()).or_insert(recipient);
    }

    pub fn from_pairs<I, G, R>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (G, R)>,
        G: Into<String>,
        R: Into<String>,
    {
        let mut prior = Self::default();
        for (giver, recipient) in pairs {
            prior.insert(giver, Some(recipient.into()));
        }
        prior
    }

    /// First row wins when a giver repeats. Rows with an empty giver are ignored.
    pub fn from_table(table: &Table) -> Result<Self> {
        let giver_col = table.require_column(EMPLOYEE_EMAIL_ID)?;
        let recipient_col = table.require_column(SECRET_CHILD_EMAIL_ID)?;

        let mut prior = Self::default();
        for row in &table.rows {
            let giver = table.cell(row, giver_col);
            if giver.is_empty() {
                continue;
            }
            let recipient = table.cell(row, recipient_col);
            let recipient = (!recipient.is_empty()).then(|| recipient.to_string());
            prior.insert(giver, recipient);
        }
        Ok(prior)
    }

    /// `None` when the giver has no record at all.
    pub fn lookup(&self, giver: &str) -> Option<Option<&str>> {
        self.recipients.get(giver).map(|r| r.as_deref())
    }

    pub fn len(&self) -> usize {
        self.recipients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipients.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Assigned {
        recipient_id: String,
        recipient_name: String,
    },
    MissingPriorRecord,
    NoEligibleCandidate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub giver: Participant,
    #[serde(flatten)]
    pub outcome: Outcome,
}

impl Assignment {
    pub fn recipient(&self) -> Option<(&str, &str)> {
        match &self.outcome {
            Outcome::Assigned {
                recipient_id,
                recipient_name,
            } => Some((recipient_id, recipient_name)),
            _ => None,
        }
    }

    pub fn is_assigned(&self) -> bool {
        matches!(self.outcome, Outcome::Assigned { .. })
    }

    /// Human-readable reason this giver was skipped.
    pub fn diagnostic(&self) -> Option<String> {
        match self.outcome {
            Outcome::Assigned { .. } => None,
            Outcome::MissingPriorRecord => Some(format!(
                "Employee with email '{}' not found in previous year's Santa list.",
                self.giver.id
            )),
            Outcome::NoEligibleCandidate => Some(format!(
                "No available employees for {}. Skipping.",
                self.giver.id
            )),
        }
    }
}

/// One complete pass over the roster: exactly one assignment per position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draw {
    pub seed: u64,
    pub assignments: Vec<Assignment>,
}

impl Draw {
    pub fn assigned_count(&self) -> usize {
        self.assignments.iter().filter(|a| a.is_assigned()).count()
    }

    pub fn skipped(&self) -> impl Iterator<Item = &Assignment> {
        self.assignments.iter().filter(|a| !a.is_assigned())
    }

    pub fn recipient_of(&self, giver: &str) -> Option<&str> {
        self.assignments
            .iter()
            .find(|a| a.giver.id == giver)
            .and_then(|a| a.recipient().map(|(id, _)| id))
    }
}

/// What the extract stage hands to the transform stage.
#[derive(Debug, Clone)]
pub struct ExchangeInput {
    pub roster_table: Table,
    pub roster: Roster,
    pub prior: PriorRound,
}

impl ExchangeInput {
    /// Givers the draw will skip because last round has no record of them.
    pub fn givers_without_prior_record(&self) -> Vec<&Participant> {
        self.roster
            .participants()
            .iter()
            .filter(|p| self.prior.lookup(&p.id).is_none())
            .collect()
    }
}

/// What a dry run reports: input sizes, the seed, and who will be skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DryRunSummary {
    pub participants: usize,
    pub prior_pairings: usize,
    pub seed: u64,
    pub without_prior_record: Vec<Participant>,
}

impl DryRunSummary {
    pub fn new(input: &ExchangeInput, seed: u64) -> Self {
        Self {
            participants: input.roster.len(),
            prior_pairings: input.prior.len(),
            seed,
            without_prior_record: input
                .givers_without_prior_record()
                .into_iter()
                .cloned()
                .collect(),
        }
    }
}

impl fmt::Display for DryRunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Roster: {} participants", self.participants)?;
        writeln!(f, "Prior round: {} pairings", self.prior_pairings)?;
        writeln!(f, "Seed: {}", self.seed)?;
        if self.without_prior_record.is_empty() {
            writeln!(f, "Every participant has a prior-round record.")
        } else {
            writeln!(
                f,
                "{} participants have no prior-round record and will be skipped:",
                self.without_prior_record.len()
            )?;
            for participant in &self.without_prior_record {
                writeln!(f, "  - {} <{}>", participant.name, participant.id)?;
            }
            Ok(())
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub exchange: String,
    pub generated_at: chrono::DateTime<chrono::Utc>,
    pub seed: u64,
    pub participants: usize,
    pub assigned: usize,
    pub skipped: usize,
    pub assignments: Vec<Assignment>,
}

impl RunReport {
    pub fn from_draw(exchange: impl Into<String>, draw: &Draw) -> Self {
        Self {
            exchange: exchange.into(),
            generated_at: chrono::Utc::now(),
            seed: draw.seed,
            participants: draw.assignments.len(),
            assigned: draw.assigned_count(),
            skipped: draw.skipped().count(),
            assignments: draw.assignments.clone(),
        }
    }
}

/// What the transform stage hands to the load stage.
#[derive(Debug, Clone)]
pub struct DrawResult {
    pub draw: Draw,
    pub output_table: Table,
    pub csv_output: String,
    pub report: RunReport,
}
