mod adapter;
mod cli;
mod domain;
mod ports;
mod usecase;
mod wiring;

#[cfg(test)]
mod tests;

use cli::{parse_args, print_completion, Config, ParseOutcome};
use common::error::Error;
use common::ports::outbound::{now_iso8601, LogLevel, LogRecord};
use ports::inbound::UseCaseRunner;
use std::process;
use wiring::{wire_recwrap, App};

/// 録画付きビルドを実行する Runner（lifecycle ログは main レイヤーに集約）
struct Runner {
    app: App,
}

impl UseCaseRunner for Runner {
    fn run(&self, config: Config) -> Result<i32, Error> {
        if config.help {
            print_help();
            return Ok(0);
        }
        let _ = self.app.logger.log(&LogRecord {
            ts: now_iso8601(),
            level: LogLevel::Info,
            message: "command started".to_string(),
            layer: Some("cli".to_string()),
            kind: Some("lifecycle".to_string()),
            fields: {
                let mut m = std::collections::BTreeMap::new();
                m.insert("build".to_string(), serde_json::json!(config.build_argv));
                Some(m)
            },
        });

        let result = self.app.record_use_case.run(&config);

        let code = result.as_ref().copied().unwrap_or(0);
        let _ = self.app.logger.log(&LogRecord {
            ts: now_iso8601(),
            level: LogLevel::Info,
            message: "command finished".to_string(),
            layer: Some("cli".to_string()),
            kind: Some("lifecycle".to_string()),
            fields: {
                let mut m = std::collections::BTreeMap::new();
                m.insert("exit_code".to_string(), serde_json::json!(code));
                Some(m)
            },
        });
        if let Err(ref e) = result {
            let _ = self.app.logger.log(&LogRecord {
                ts: now_iso8601(),
                level: LogLevel::Error,
                message: e.to_string(),
                layer: Some("cli".to_string()),
                kind: Some("error".to_string()),
                fields: None,
            });
        }
        result
    }
}

fn main() {
    let exit_code = match run() {
        Ok(code) => code,
        Err(e) => {
            if e.is_usage() {
                print_usage();
            }
            eprintln!("recwrap: {}", e);
            e.exit_code()
        }
    };
    process::exit(exit_code);
}

pub fn run() -> Result<i32, Error> {
    let outcome = parse_args()?;
    let config = match &outcome {
        ParseOutcome::Config(c) => c.clone(),
        ParseOutcome::GenerateCompletion(shell) => {
            print_completion(*shell);
            return Ok(0);
        }
    };
    let app = wire_recwrap(&config);
    let runner = Runner { app };
    runner.run(config)
}

fn print_usage() {
    eprintln!("Usage: recwrap [options] -- <command> [args...]");
}

fn print_help() {
    println!("Usage: recwrap [options] -- <command> [args...]");
    println!("Options:");
    println!("  -h, --help                     Show this help message");
    println!("  -v, --verbose                  Emit structured logs to stderr (when RECWRAP_LOG_FILE is unset)");
    println!("  -C, --command <template>       Screen capture command template for this run");
    println!("  --default-command <template>   Global default capture command. Default: ffmpeg x11grab on :0.0,");
    println!("                                 or the RECWRAP_DEFAULT_COMMAND environment variable when set.");
    println!("  -o, --output <path>            Recording output path template. Default: {}", cli::DEFAULT_OUTPUT_TEMPLATE);
    println!("  --no-fail-on-error             Do not fail the build when video recording fails");
    println!("  --warmup-ms <ms>               Delay before starting the capture process (default 3000)");
    println!("  --drain-ms <ms>                Delay after the graceful stop, for the output to flush (default 1000)");
    println!("  --archive-dir <dir>            Archive directory for the recording and its viewer page");
    println!("  --generate <shell>             Generate shell completion script (bash, zsh, fish)");
    println!();
    println!("Environment:");
    println!("  WORKSPACE, JOB_NAME, BUILD_NUMBER, JENKINS_HOME");
    println!("                          Macro values for ${{...}} expansion in templates.");
    println!("  RECWRAP_DEFAULT_COMMAND Global default capture command.");
    println!("  RECWRAP_LOG_FILE        Structured JSONL log destination. Unset: no structured log.");
    println!("  RECWRAP_CSP             Initial content security policy for the viewer host.");
    println!();
    println!("Description:");
    println!("  Starts a screen capture process, runs the wrapped build command, then stops the");
    println!("  capture gracefully, archives the recording, and emits an embedded viewer page.");
    println!();
    println!("Examples:");
    println!("  recwrap -- mvn verify");
    println!("  recwrap --no-fail-on-error -- make test");
    println!("  recwrap -C 'ffmpeg -f x11grab -i :1.0' -o /tmp/run.mp4 -- ./run-ui-tests.sh");
}
