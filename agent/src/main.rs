use std::sync::Arc;

use agent_runtime::{
    logging, AgentConfig, AgentRuntime, EchoEngine, LocalLedger, MonotonicClock,
};
use anyhow::{bail, Context};
use serde_json::{json, Value};

const USAGE: &str = "usage: agent-runtime [--chain] [--context <json>] <task>...";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AgentConfig::from_env().context("failed to load configuration")?;
    config.validate()?;
    logging::init_logging(&config.log_level)?;

    let mut chain = false;
    let mut context = Value::Null;
    let mut tasks = Vec::new();
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--chain" => chain = true,
            "--context" => {
                let raw = args.next().context(USAGE)?;
                context = serde_json::from_str(&raw).context("--context is not valid JSON")?;
            }
            "-h" | "--help" => {
                println!("{USAGE}");
                return Ok(());
            }
            _ => tasks.push(arg),
        }
    }
    if tasks.is_empty() {
        bail!(USAGE);
    }

    let deployment = agent_work_host::config::deployment(&config.cluster)?;
    tracing::info!(
        agent = %config.agent_address,
        cluster = deployment.cluster,
        reward_program = deployment.reward_program_id,
        verifier_program = deployment.verifier_program_id,
        model = %config.model_id,
        "starting agent"
    );

    // The local ledger names the agent as its own reward authority.
    let ledger = Arc::new(LocalLedger::new(config.agent_address));
    let runtime = AgentRuntime::new(
        config,
        Arc::new(EchoEngine::default()),
        ledger,
        Arc::new(MonotonicClock::new()),
    );

    let report = if chain {
        let steps: Vec<(&str, Value)> = tasks
            .iter()
            .map(|task| (task.as_str(), context.clone()))
            .collect();
        serde_json::to_value(runtime.execute_task_chain(&steps).await?)?
    } else {
        let mut executions = Vec::with_capacity(tasks.len());
        for task in &tasks {
            executions.push(runtime.execute_task(task, &context).await?);
        }
        serde_json::to_value(executions)?
    };

    let output = json!({
        "executions": report,
        "reputation": runtime.reputation().await?,
        "performance": runtime.performance().await,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
