mod pipeline;
use std::env::{set_var, var};
use std::error::Error;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::exit;

use clap::{arg, command, Parser};
use log::info;

use pipeline::{Job, Pipeline, Status};
use wrfplot::version::LONG_VERSION;

#[derive(Parser, Debug)]
#[command(
    version,
    long_version=LONG_VERSION,
    about="Runs the download, model and upload scripts of a forecast job",
    long_about="Reads a job description ({\"input\": {\"ftp_user\", \"ftp_pass\", \"ftp_host\", \"ftp_dir\"}}), runs the job scripts in order with the FTP settings in their environment and prints the resulting status record as JSON."
)]
struct Args {
    #[arg(long, help = "Job JSON file, read from stdin when missing or '-'")]
    job: Option<String>,

    #[arg(long, alias = "scripts_dir", default_value = ".", help = "Directory with the job scripts")]
    scripts_dir: PathBuf,
}

fn read_job(path: Option<&str>) -> Result<String, Box<dyn Error>> {
    let mut contents = String::new();
    match path {
        None | Some("-") => {
            io::stdin().read_to_string(&mut contents)?;
        }
        Some(path) => {
            contents = fs::read_to_string(path)
                .map_err(|err| format!("Cannot read job file {}: {}", path, err))?;
        }
    }
    Ok(contents)
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    if var("RUST_LOG").is_err() {
        set_var("RUST_LOG", "info")
    }
    pretty_env_logger::init();

    let contents = read_job(args.job.as_deref())?;
    let job = if contents.trim().is_empty() {
        Job::default()
    } else {
        Job::from_json(&contents)?
    };

    info!("Running job scripts in {}", args.scripts_dir.display());
    let record = Pipeline::new(&args.scripts_dir, job).run();
    println!("{}", serde_json::to_string(&record)?);

    if record.status == Status::Error {
        exit(1);
    }
    Ok(())
}
