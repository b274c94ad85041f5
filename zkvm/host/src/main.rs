use std::io::Read;

use agent_work_guest::{commit, ProofJournal, ProofKind, WorkRecord, WorkWitness};
use agent_work_host::WorkProof;
use tracing_subscriber::EnvFilter;

const USAGE: &str =
    "usage: agent-work-host [prove [--stdin]|chain --stdin|verify --stdin|commit <text>|image-id]";

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(message) = run() {
        tracing::error!(%message, "command failed");
        eprintln!("{message}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let mut args = std::env::args();
    let _bin = args.next();

    match args.next().as_deref() {
        None | Some("prove") => {
            let use_stdin = args.any(|a| a == "--stdin");
            let request = if use_stdin {
                read_json::<WorkRequest>()?
            } else {
                WorkRequest::sample()
            };
            let (record, witness) = request.bind();
            let proof = agent_work_host::prove_work(&record, &witness).map_err(|e| e.to_string())?;
            tracing::info!(units = record.compute_units, "base proof generated");
            print_proof(&proof)
        }
        Some("chain") => {
            require_stdin(args)?;
            let request = read_json::<ChainRequest>()?;
            let (record, _) = request.work.bind();
            let proof = agent_work_host::verify_chain(&record, &request.previous)
                .map_err(|e| e.to_string())?;
            tracing::info!(units = record.compute_units, "chained proof generated");
            print_proof(&proof)
        }
        Some("verify") => {
            require_stdin(args)?;
            let proof = read_json::<WorkProof>()?;
            let statement = agent_work_host::verify_proof(&proof).map_err(|e| e.to_string())?;
            let summary = StatementSummary::from_journal(&statement)?;
            let output = serde_json::to_string(&summary).map_err(|e| e.to_string())?;
            println!("{output}");
            Ok(())
        }
        Some("commit") => {
            let text = args
                .next()
                .ok_or_else(|| format!("commit needs a text argument. {USAGE}"))?;
            println!("{}", hex::encode(commit(text.as_bytes()).as_bytes()));
            Ok(())
        }
        Some("image-id") => {
            let image_id = agent_work_host::work_image_id();
            println!("{}", hex::encode(image_id));
            #[cfg(not(feature = "production-prover"))]
            eprintln!("note: simulated image id; build with --features production-prover for the guest ELF id");
            Ok(())
        }
        Some(other) => Err(format!("unsupported command: {other}. {USAGE}")),
    }
}

/// Plain-text description of one unit of work. Text fields are committed
/// before they reach the prover.
#[derive(serde::Deserialize)]
struct WorkRequest {
    task_id: String,
    model: String,
    input: String,
    output: String,
    compute_units: u64,
    timestamp: u64,
}

impl WorkRequest {
    fn sample() -> Self {
        Self {
            task_id: "task-1".into(),
            model: "model:llama-3-8b".into(),
            input: "translate 'good morning' to french".into(),
            output: "bonjour".into(),
            compute_units: 7,
            timestamp: 1_700_000_000_000,
        }
    }

    fn bind(&self) -> (WorkRecord, WorkWitness) {
        let witness = WorkWitness {
            model_commitment: commit(self.model.as_bytes()),
            input_commitment: commit(self.input.as_bytes()),
            output_value: commit(self.output.as_bytes()),
        };
        let record = WorkRecord::bind(
            commit(self.task_id.as_bytes()),
            &witness,
            self.compute_units,
            self.timestamp,
        );
        (record, witness)
    }
}

#[derive(serde::Deserialize)]
struct ChainRequest {
    previous: WorkProof,
    #[serde(flatten)]
    work: WorkRequest,
}

#[derive(serde::Serialize)]
struct StatementSummary {
    kind: &'static str,
    task_id: String,
    result_hash: String,
    compute_units: u64,
    timestamp: u64,
    aggregate_units: String,
}

impl StatementSummary {
    fn from_journal(journal: &ProofJournal) -> Result<Self, String> {
        let aggregate = journal.aggregate_units().map_err(|e| e.to_string())?;
        Ok(Self {
            kind: match journal.kind {
                ProofKind::Base => "base",
                ProofKind::Chained => "chained",
            },
            task_id: hex::encode(journal.record.task_id.as_bytes()),
            result_hash: hex::encode(journal.record.result_hash.as_bytes()),
            compute_units: journal.record.compute_units,
            timestamp: journal.record.timestamp,
            // u128 does not survive every JSON consumer.
            aggregate_units: aggregate.to_string(),
        })
    }
}

fn require_stdin(mut args: std::env::Args) -> Result<(), String> {
    if args.any(|a| a == "--stdin") {
        Ok(())
    } else {
        Err(format!("this command reads its input from --stdin. {USAGE}"))
    }
}

fn read_json<T: serde::de::DeserializeOwned>() -> Result<T, String> {
    let mut input = String::new();
    std::io::stdin()
        .read_to_string(&mut input)
        .map_err(|e| format!("failed to read stdin: {e}"))?;
    serde_json::from_str(&input).map_err(|e| format!("invalid JSON input: {e}"))
}

fn print_proof(proof: &WorkProof) -> Result<(), String> {
    let output = agent_work_host::render_work_proof(proof).map_err(|e| e.to_string())?;
    println!("{output}");
    Ok(())
}

