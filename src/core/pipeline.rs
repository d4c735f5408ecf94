use crate::adapters::tabular::{read_table, write_csv};
use crate::core::engine;
use crate::core::{ConfigProvider, DrawResult, ExchangeInput, Pipeline, Storage};
use crate::domain::model::{
    Draw, DryRunSummary, PriorRound, Roster, RunReport, Table, ASSIGNED, SECRET_CHILD_EMAIL_ID,
    SECRET_CHILD_NAME,
};
use crate::utils::error::{Result, SantaError};
use rand::rngs::StdRng;
use rand::SeedableRng;

pub struct SantaPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    seed: u64,
}

impl<S: Storage, C: ConfigProvider> SantaPipeline<S, C> {
    /// Uses the configured seed, or picks a fresh one so the run can be replayed.
    pub fn new(storage: S, config: C) -> Self {
        let seed = match config.seed() {
            Some(seed) => seed,
            None => {
                let seed = rand::random::<u64>();
                tracing::info!("No seed configured, using {} (pass --seed {} to replay)", seed, seed);
                seed
            }
        };
        Self {
            storage,
            config,
            seed,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Runs only the extract stage and summarizes what a draw would see.
    pub async fn dry_run(&self) -> Result<DryRunSummary> {
        let input = self.extract().await?;
        Ok(DryRunSummary::new(&input, self.seed))
    }

    async fn load_table(&self, path: &str, sheet: Option<&str>) -> Result<Table> {
        tracing::debug!("Reading {} (sheet: {:?})", path, sheet);
        let bytes = self.storage.read_file(path).await?;
        read_table(path, bytes, sheet)
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for SantaPipeline<S, C> {
    async fn extract(&self) -> Result<ExchangeInput> {
        let roster_table = self
            .load_table(self.config.roster_path(), self.config.roster_sheet())
            .await?;
        let roster = Roster::from_table(&roster_table)?;

        let prior_table = self
            .load_table(self.config.prior_path(), self.config.prior_sheet())
            .await?;
        let prior = PriorRound::from_table(&prior_table)?;

        Ok(ExchangeInput {
            roster_table,
            roster,
            prior,
        })
    }

    async fn transform(&self, input: ExchangeInput) -> Result<DrawResult> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let draw = engine::draw(&input.roster, &input.prior, &mut rng, self.seed);

        let output_table = build_output_table(&input.roster_table, &draw)?;
        let csv_output = write_csv(&output_table)?;
        let report = RunReport::from_draw(self.config.exchange_name(), &draw);

        Ok(DrawResult {
            draw,
            output_table,
            csv_output,
            report,
        })
    }

    async fn load(&self, result: DrawResult) -> Result<String> {
        let mut written = Vec::new();

        if self.config.wants_format("csv") {
            let path = self.config.output_file();
            tracing::debug!("Writing {} rows to {}", result.output_table.len(), path);
            self.storage
                .write_file(path, result.csv_output.as_bytes())
                .await?;
            written.push(path.to_string());
        }

        if self.config.wants_format("json") {
            let path = self.config.report_file();
            let json_data = serde_json::to_string_pretty(&result.report)?;
            tracing::debug!("Writing run report ({} bytes) to {}", json_data.len(), path);
            self.storage.write_file(path, json_data.as_bytes()).await?;
            written.push(path.to_string());
        }

        if written.is_empty() {
            return Err(SantaError::MissingConfigError {
                field: "output_formats".to_string(),
            });
        }

        Ok(written.join(", "))
    }
}

/// The roster rows as read, plus `Secret_Child_Name` / `Secret_Child_EmailID`.
///
/// Existing columns of those names are overwritten in place and an
/// `Assigned` column is dropped. Unassigned givers get empty cells.
pub fn build_output_table(roster_table: &Table, draw: &Draw) -> Result<Table> {
    if roster_table.len() != draw.assignments.len() {
        return Err(SantaError::ProcessingError {
            message: format!(
                "roster has {} rows but the draw has {} assignments",
                roster_table.len(),
                draw.assignments.len()
            ),
        });
    }

    let kept: Vec<usize> = roster_table
        .headers
        .iter()
        .enumerate()
        .filter(|(_, header)| header.as_str() != ASSIGNED)
        .map(|(i, _)| i)
        .collect();

    let mut headers: Vec<String> = kept
        .iter()
        .map(|&i| roster_table.headers[i].clone())
        .collect();
    let name_col = position_or_push(&mut headers, SECRET_CHILD_NAME);
    let email_col = position_or_push(&mut headers, SECRET_CHILD_EMAIL_ID);

    let mut table = Table::new("output", headers);
    for (row, assignment) in roster_table.rows.iter().zip(&draw.assignments) {
        let mut out: Vec<String> = kept
            .iter()
            .map(|&i| roster_table.cell(row, i).to_string())
            .collect();
        out.resize(table.headers.len(), String::new());

        let (recipient_id, recipient_name) = assignment.recipient().unwrap_or(("", ""));
        out[name_col] = recipient_name.to_string();
        out[email_col] = recipient_id.to_string();
        table.rows.push(out);
    }

    Ok(table)
}

fn position_or_push(headers: &mut Vec<String>, column: &str) -> usize {
    match headers.iter().position(|h| h == column) {
        Some(i) => i,
        None => {
            headers.push(column.to_string());
            headers.len() - 1
        }
    }
}
