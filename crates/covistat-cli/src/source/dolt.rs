//! Dolt SQL repository source
//!
//! The case table lives in a Dolt repository. [`DoltServer`] owns a
//! `dolt sql-server` process for the duration of a fetch and terminates it
//! when dropped, whether the query succeeded or not.

use std::{
    net::{Ipv4Addr, SocketAddr, TcpStream},
    path::{Path, PathBuf},
    process::{Child, Command, Stdio},
    thread,
    time::{Duration, Instant},
};

use anyhow::{Context, bail};
use covistat_analysis::record::CaseAggregate;
use serde::Deserialize;

use crate::{source::CaseDataSource, util};

/// Columns that may be NULL, which `dolt sql` omits from a JSON row.
const NULLABLE_COLUMNS: [&str; 2] = ["sex", "nationality"];

const READY_TIMEOUT: Duration = Duration::from_secs(10);
const READY_POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone)]
pub(crate) struct DoltSource {
    repo: PathBuf,
    database: String,
    table: String,
    port: u16,
}

impl DoltSource {
    pub(crate) fn new(
        repo: PathBuf,
        database: String,
        table: String,
        port: u16,
    ) -> anyhow::Result<Self> {
        validate_identifier("database", &database)?;
        validate_identifier("table", &table)?;
        Ok(Self {
            repo,
            database,
            table,
            port,
        })
    }
}

impl CaseDataSource for DoltSource {
    fn describe(&self) -> String {
        format!(
            "dolt://{}/{}.{}",
            self.repo.display(),
            self.database,
            self.table
        )
    }

    fn fetch(&self) -> anyhow::Result<Vec<CaseAggregate>> {
        let query = case_aggregate_query(&self.table);
        let server = DoltServer::start(&self.repo, self.port)?;
        let rows = server.query(&self.database, &query)?;
        server.close()?;
        util::decode_rows("case aggregate", fill_null_columns(rows))
    }
}

/// A running `dolt sql-server` process, terminated on drop.
#[derive(Debug)]
pub(crate) struct DoltServer {
    process: Option<Child>,
    repo: PathBuf,
    port: u16,
}

impl DoltServer {
    /// Starts a SQL server in `repo` and waits until it accepts connections.
    pub(crate) fn start(repo: &Path, port: u16) -> anyhow::Result<Self> {
        let process = Command::new("dolt")
            .args(["sql-server", "--port", &port.to_string()])
            .current_dir(repo)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| format!("Failed to start dolt sql-server in {}", repo.display()))?;

        let mut server = Self {
            process: Some(process),
            repo: repo.to_owned(),
            port,
        };
        server.wait_ready()?;
        log::info!("Dolt server listening on port {port}");
        Ok(server)
    }

    fn wait_ready(&mut self) -> anyhow::Result<()> {
        let address = SocketAddr::from((Ipv4Addr::LOCALHOST, self.port));
        let deadline = Instant::now() + READY_TIMEOUT;
        loop {
            if let Some(process) = &mut self.process
                && let Some(status) = process
                    .try_wait()
                    .context("Failed to poll dolt sql-server")?
            {
                bail!("dolt sql-server exited before accepting connections ({status})");
            }
            if TcpStream::connect_timeout(&address, READY_POLL_INTERVAL).is_ok() {
                return Ok(());
            }
            if Instant::now() >= deadline {
                bail!(
                    "dolt sql-server did not accept connections on {address} within {}s",
                    READY_TIMEOUT.as_secs()
                );
            }
            thread::sleep(READY_POLL_INTERVAL);
        }
    }

    /// Runs `sql` against `database` and returns the result rows.
    pub(crate) fn query(
        &self,
        database: &str,
        sql: &str,
    ) -> anyhow::Result<Vec<serde_json::Value>> {
        let port = self.port.to_string();
        let output = Command::new("dolt")
            .args([
                "--host",
                "127.0.0.1",
                "--port",
                &port,
                "--no-tls",
                "--user",
                "root",
                "--password",
                "",
                "--use-db",
                database,
                "sql",
                "--result-format",
                "json",
                "--query",
                sql,
            ])
            .current_dir(&self.repo)
            .stdin(Stdio::null())
            .output()
            .context("Failed to run dolt sql client")?;

        if !output.status.success() {
            bail!(
                "SQL query failed ({}): {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        let rows = parse_query_output(&output.stdout)?;
        log::info!("SQL query returned {} rows", rows.len());
        Ok(rows)
    }

    /// Stops the server, reporting any failure to do so.
    pub(crate) fn close(mut self) -> anyhow::Result<()> {
        self.terminate()
    }

    fn terminate(&mut self) -> anyhow::Result<()> {
        let Some(mut process) = self.process.take() else {
            return Ok(());
        };
        process.kill().context("Failed to terminate dolt sql-server")?;
        process.wait().context("Failed to wait for dolt sql-server")?;
        log::info!("Dolt server terminated");
        Ok(())
    }
}

impl Drop for DoltServer {
    fn drop(&mut self) {
        if let Err(err) = self.terminate() {
            log::error!("{err:#}");
        }
    }
}

#[derive(Debug, Deserialize)]
struct QueryOutput {
    #[serde(default)]
    rows: Vec<serde_json::Value>,
}

/// Parses the JSON result format of `dolt sql`.
///
/// An empty result set may be printed as nothing at all.
fn parse_query_output(stdout: &[u8]) -> anyhow::Result<Vec<serde_json::Value>> {
    if stdout.iter().all(u8::is_ascii_whitespace) {
        return Ok(vec![]);
    }
    let output: QueryOutput =
        serde_json::from_slice(stdout).context("Failed to parse dolt sql JSON output")?;
    Ok(output.rows)
}

/// Restores the NULL columns omitted from the rows of a JSON result.
///
/// Other missing columns are left for decoding to reject.
fn fill_null_columns(mut rows: Vec<serde_json::Value>) -> Vec<serde_json::Value> {
    for row in &mut rows {
        if let serde_json::Value::Object(columns) = row {
            for column in NULLABLE_COLUMNS {
                columns.entry(column).or_insert(serde_json::Value::Null);
            }
        }
    }
    rows
}

fn validate_identifier(kind: &str, name: &str) -> anyhow::Result<()> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '-');
    if !valid {
        bail!("Invalid {kind} name '{name}': only letters, digits, '_' and '-' are allowed");
    }
    Ok(())
}

/// Builds the query that buckets and counts the cases of `table`.
///
/// `table` must have passed [`validate_identifier`].
fn case_aggregate_query(table: &str) -> String {
    format!(
        "SELECT
    CASE
        WHEN age BETWEEN 0 AND 17 THEN '0-17'
        WHEN age BETWEEN 18 AND 25 THEN '18-25'
        WHEN age BETWEEN 26 AND 35 THEN '26-35'
        WHEN age BETWEEN 36 AND 50 THEN '36-50'
        WHEN age BETWEEN 51 AND 65 THEN '51-65'
        WHEN age > 65 THEN '65+'
        ELSE 'unknown'
    END AS age_group,
    sex,
    nationality,
    CASE
        WHEN current_status IN ('admitted', 'isolated', 'quarantined', 'in hospital') THEN 'infected'
        WHEN current_status IN ('dead', 'deceased', 'died') THEN 'deceased'
        WHEN current_status IN ('recovered') THEN 'recovered'
        ELSE 'unknown'
    END AS infection_status,
    COUNT(*) AS count
FROM `{table}`
GROUP BY age_group, sex, nationality, infection_status
ORDER BY age_group, sex, nationality, infection_status"
    )
}
