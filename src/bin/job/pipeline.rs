use std::{
    fs,
    path::{Path, PathBuf},
    process::{Command, ExitStatus},
};

use log::{error, info};
use serde_derive::{Deserialize, Serialize};

use wrfplot::helpers::WrfPlotError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobInput {
    pub ftp_user: String,
    pub ftp_pass: String,
    pub ftp_host: String,
    pub ftp_dir: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Job {
    pub input: JobInput,
}

impl Job {
    pub fn from_json(contents: &str) -> Result<Self, WrfPlotError> {
        serde_json::from_str(contents).map_err(|err| format!("Invalid job: {err}").into())
    }

    /// environment exported to every step
    pub fn environment(&self) -> [(&'static str, &str); 4] {
        [
            ("FTP_USER", self.input.ftp_user.as_str()),
            ("FTP_PASS", self.input.ftp_pass.as_str()),
            ("FTP_HOST", self.input.ftp_host.as_str()),
            ("FTP_DIR", self.input.ftp_dir.as_str()),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusRecord {
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl StatusRecord {
    pub fn success() -> Self {
        StatusRecord {
            status: Status::Success,
            step: None,
            details: None,
        }
    }

    pub fn failure(status: Status, step: &str, details: String) -> Self {
        StatusRecord {
            status,
            step: Some(step.to_string()),
            details: Some(details),
        }
    }
}

pub struct Step {
    pub script: &'static str,
    /// step name reported in the status record
    pub name: &'static str,
    /// status reported when the script exits with an error
    pub on_failure: Status,
    /// a script that cannot be started is logged and skipped
    pub optional_spawn: bool,
}

pub const STEPS: [Step; 5] = [
    Step {
        script: "start_cleaner.sh",
        name: "start_cleaner",
        on_failure: Status::Error,
        optional_spawn: false,
    },
    Step {
        script: "ftp_download.sh",
        name: "ftp_download",
        on_failure: Status::Error,
        optional_spawn: false,
    },
    Step {
        script: "run.sh",
        name: "run.sh",
        on_failure: Status::Warning,
        optional_spawn: true,
    },
    Step {
        script: "upload_logs.sh",
        name: "upload_logs.sh",
        on_failure: Status::Warning,
        optional_spawn: false,
    },
    Step {
        script: "end_cleaner.sh",
        name: "end_cleaner",
        on_failure: Status::Error,
        optional_spawn: false,
    },
];

enum StepFailure {
    Exit(String),
    Spawn(String),
}

fn describe_exit(script: &str, status: &ExitStatus) -> String {
    match status.code() {
        Some(code) => format!("Command './{script}' returned non-zero exit status {code}."),
        None => format!("Command './{script}' was terminated by a signal."),
    }
}

/// Runs the job scripts in order and maps the first failure to a status.
pub struct Pipeline {
    scripts_dir: PathBuf,
    job: Job,
}

impl Pipeline {
    pub fn new(scripts_dir: &Path, job: Job) -> Self {
        let scripts_dir = fs::canonicalize(scripts_dir).unwrap_or_else(|_| scripts_dir.to_path_buf());
        Pipeline { scripts_dir, job }
    }

    fn run_step(&self, step: &Step) -> Result<(), StepFailure> {
        let mut command = Command::new(self.scripts_dir.join(step.script));
        command.current_dir(&self.scripts_dir);
        for (key, value) in self.job.environment() {
            command.env(key, value);
        }

        let status = command
            .status()
            .map_err(|err| StepFailure::Spawn(format!("Cannot run ./{}: {err}", step.script)))?;
        if status.success() {
            Ok(())
        } else {
            Err(StepFailure::Exit(describe_exit(step.script, &status)))
        }
    }

    pub fn run(&self) -> StatusRecord {
        for step in &STEPS {
            info!(">> Running {}...", step.script);
            match self.run_step(step) {
                Ok(()) => info!("{} executed successfully.", step.script),
                Err(StepFailure::Spawn(details)) if step.optional_spawn => {
                    error!("Error during {}: {details}", step.script);
                }
                Err(StepFailure::Spawn(details)) => {
                    error!("Error during {}: {details}", step.script);
                    return StatusRecord::failure(Status::Error, step.name, details);
                }
                Err(StepFailure::Exit(details)) => {
                    error!("Error during {}: {details}", step.script);
                    return StatusRecord::failure(step.on_failure, step.name, details);
                }
            }
        }
        info!("All steps completed successfully.");
        StatusRecord::success()
    }
}

#[cfg(test)]
mod tests {
    use std::os::unix::fs::PermissionsExt;

    use super::*;

    fn script(dir: &Path, name: &str, body: &str) {
        let path = dir.join(name);
        fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    }

    /// every step appends its name to `steps.log`
    fn scripts(dir: &Path, failing: &[(&str, i32)], missing: &[&str]) {
        for step in &STEPS {
            if missing.contains(&step.script) {
                continue;
            }
            let code = failing
                .iter()
                .find(|(name, _)| *name == step.script)
                .map_or(0, |(_, code)| *code);
            script(
                dir,
                step.script,
                &format!("echo {} >> steps.log\nexit {code}", step.script),
            );
        }
    }

    fn executed(dir: &Path) -> Vec<String> {
        fs::read_to_string(dir.join("steps.log"))
            .unwrap_or_default()
            .lines()
            .map(String::from)
            .collect()
    }

    fn job() -> Job {
        Job::from_json(r#"{"input": {"ftp_user": "meteo", "ftp_host": "ftp.example.org"}}"#)
            .unwrap()
    }

    #[test]
    fn job_defaults() {
        let job = job();
        assert_eq!(job.input.ftp_user, "meteo");
        assert_eq!(job.input.ftp_pass, "");
        assert_eq!(Job::from_json("{}").unwrap(), Job::default());
        assert!(Job::from_json("[").is_err());
    }

    #[test]
    fn status_records() {
        let json = serde_json::to_string(&StatusRecord::success()).unwrap();
        assert_eq!(json, r#"{"status":"success"}"#);
        let record = StatusRecord::failure(Status::Warning, "run.sh", "boom".into());
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"status":"warning","step":"run.sh","details":"boom"}"#);
    }

    // a single test so that no script is exec'd while another is being written
    #[test]
    fn pipeline_outcomes() {
        let all: Vec<String> = STEPS.iter().map(|s| s.script.to_string()).collect();

        // everything succeeds and sees the job environment
        let dir = tempfile::tempdir().unwrap();
        scripts(dir.path(), &[], &[]);
        script(dir.path(), "run.sh", "echo run.sh >> steps.log\necho \"$FTP_USER@$FTP_HOST:$FTP_DIR\" > env.txt");
        let record = Pipeline::new(dir.path(), job()).run();
        assert_eq!(record, StatusRecord::success());
        assert_eq!(executed(dir.path()), all);
        let env = fs::read_to_string(dir.path().join("env.txt")).unwrap();
        assert_eq!(env.trim(), "meteo@ftp.example.org:");

        // download failure stops the pipeline with an error
        let dir = tempfile::tempdir().unwrap();
        scripts(dir.path(), &[("ftp_download.sh", 2)], &[]);
        let record = Pipeline::new(dir.path(), job()).run();
        assert_eq!(record.status, Status::Error);
        assert_eq!(record.step.as_deref(), Some("ftp_download"));
        assert_eq!(
            record.details.as_deref(),
            Some("Command './ftp_download.sh' returned non-zero exit status 2.")
        );
        assert_eq!(executed(dir.path()), vec!["start_cleaner.sh", "ftp_download.sh"]);

        // model run failure is a warning and stops the pipeline
        let dir = tempfile::tempdir().unwrap();
        scripts(dir.path(), &[("run.sh", 1)], &[]);
        let record = Pipeline::new(dir.path(), job()).run();
        assert_eq!(record.status, Status::Warning);
        assert_eq!(record.step.as_deref(), Some("run.sh"));
        assert_eq!(executed(dir.path()).len(), 3);

        // a model run that cannot start is logged and skipped
        let dir = tempfile::tempdir().unwrap();
        scripts(dir.path(), &[], &["run.sh"]);
        let record = Pipeline::new(dir.path(), job()).run();
        assert_eq!(record, StatusRecord::success());
        assert_eq!(
            executed(dir.path()),
            vec!["start_cleaner.sh", "ftp_download.sh", "upload_logs.sh", "end_cleaner.sh"]
        );

        // any other step that cannot start is an error
        let dir = tempfile::tempdir().unwrap();
        scripts(dir.path(), &[], &["start_cleaner.sh"]);
        let record = Pipeline::new(dir.path(), job()).run();
        assert_eq!(record.status, Status::Error);
        assert_eq!(record.step.as_deref(), Some("start_cleaner"));
        assert!(executed(dir.path()).is_empty());

        // log upload failure is a warning
        let dir = tempfile::tempdir().unwrap();
        scripts(dir.path(), &[("upload_logs.sh", 5)], &[]);
        let record = Pipeline::new(dir.path(), job()).run();
        assert_eq!(record.status, Status::Warning);
        assert_eq!(record.step.as_deref(), Some("upload_logs.sh"));
        assert_eq!(executed(dir.path()).len(), 4);

        // final cleanup failure is an error
        let dir = tempfile::tempdir().unwrap();
        scripts(dir.path(), &[("end_cleaner.sh", 1)], &[]);
        let record = Pipeline::new(dir.path(), job()).run();
        assert_eq!(record.status, Status::Error);
        assert_eq!(record.step.as_deref(), Some("end_cleaner"));
        assert_eq!(executed(dir.path()), all);
    }
}
