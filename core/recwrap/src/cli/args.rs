use crate::usecase::supervisor::{DEFAULT_DRAIN_MS, DEFAULT_WARMUP_MS};
use clap::builder::ArgAction;
use clap::value_parser;
use clap_complete::Shell;
use common::error::Error;

/// キャプチャコマンドのグローバル既定（RECWRAP_DEFAULT_COMMAND で上書き可能）
pub const DEFAULT_CAPTURE_COMMAND: &str =
    "ffmpeg -video_size 1920x1080 -framerate 25 -f x11grab -i :0.0";

/// 出力パステンプレートの既定
pub const DEFAULT_OUTPUT_TEMPLATE: &str = "${WORKSPACE}/${JOB_NAME}_${BUILD_NUMBER}.mp4";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub help: bool,
    /// -v / --verbose: 不具合調査用に構造化ログを stderr へ出力する
    /// （RECWRAP_LOG_FILE 設定時はファイル出力が優先）
    pub verbose: bool,
    /// -C / --command: キャプチャコマンドテンプレート（空なら default_command）
    pub command: String,
    /// --default-command: キャプチャコマンドのグローバル既定
    /// （未指定なら環境変数 RECWRAP_DEFAULT_COMMAND → 組み込み既定）
    pub default_command: String,
    /// -o / --output: 出力パステンプレート（マクロ展開前）
    pub output_template: String,
    /// --no-fail-on-error: 録画失敗をビルド失敗にしない
    pub no_fail_on_error: bool,
    /// --warmup-ms: キャプチャ起動前の待ち時間
    pub warmup_ms: u64,
    /// --drain-ms: graceful stop 後のドレイン待ち時間
    pub drain_ms: u64,
    /// --archive-dir: アーカイブディレクトリ（未指定ならホスト規約から解決）
    pub archive_dir: Option<String>,
    /// `--` 以降: ラップ対象のビルドコマンド
    pub build_argv: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            help: false,
            verbose: false,
            command: String::new(),
            default_command: DEFAULT_CAPTURE_COMMAND.to_string(),
            output_template: DEFAULT_OUTPUT_TEMPLATE.to_string(),
            no_fail_on_error: false,
            warmup_ms: DEFAULT_WARMUP_MS,
            drain_ms: DEFAULT_DRAIN_MS,
            archive_dir: None,
            build_argv: Vec::new(),
        }
    }
}

impl Config {
    /// 録画失敗時にビルドを失敗させるか
    pub fn fail_on_error(&self) -> bool {
        !self.no_fail_on_error
    }
}

/// 解析結果: 通常の Config / 補完スクリプト生成
#[derive(Debug, Clone)]
pub enum ParseOutcome {
    Config(Config),
    GenerateCompletion(Shell),
}

fn build_clap_command() -> clap::Command {
    clap::Command::new("recwrap")
        .about("Run a build command with screen capture, then archive the recording")
        .disable_help_flag(true)
        .arg(
            clap::Arg::new("help")
                .short('h')
                .long("help")
                .help("Show this help message")
                .action(ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Emit structured logs to stderr (when RECWRAP_LOG_FILE is unset)")
                .action(ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("command")
                .short('C')
                .long("command")
                .value_name("template")
                .help("Screen capture command template (macros like ${JOB_NAME} are expanded)")
                .num_args(1),
        )
        .arg(
            clap::Arg::new("default-command")
                .long("default-command")
                .value_name("template")
                .help("Global default capture command (used when --command is not given)")
                .num_args(1),
        )
        .arg(
            clap::Arg::new("output")
                .short('o')
                .long("output")
                .value_name("path")
                .help("Recording output path template")
                .default_value(DEFAULT_OUTPUT_TEMPLATE)
                .num_args(1),
        )
        .arg(
            clap::Arg::new("no-fail-on-error")
                .long("no-fail-on-error")
                .help("Do not fail the build when video recording fails")
                .action(ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("warmup-ms")
                .long("warmup-ms")
                .value_name("ms")
                .help("Delay before starting the capture process")
                .value_parser(value_parser!(u64))
                .num_args(1),
        )
        .arg(
            clap::Arg::new("drain-ms")
                .long("drain-ms")
                .value_name("ms")
                .help("Delay after the graceful stop, for the capture tool to flush its output")
                .value_parser(value_parser!(u64))
                .num_args(1),
        )
        .arg(
            clap::Arg::new("archive-dir")
                .long("archive-dir")
                .value_name("dir")
                .help("Archive directory for the recording and its viewer page")
                .num_args(1),
        )
        .arg(
            clap::Arg::new("generate")
                .long("generate")
                .value_name("shell")
                .help("Generate shell completion script")
                .value_parser(value_parser!(Shell))
                .num_args(1),
        )
        .arg(
            clap::Arg::new("build")
                .index(1)
                .value_name("command")
                .help("Build command to wrap (after --)")
                .num_args(0..)
                .trailing_var_arg(true),
        )
}

fn matches_to_config(matches: &clap::ArgMatches) -> Config {
    let default_command = matches
        .get_one::<String>("default-command")
        .cloned()
        .or_else(|| {
            std::env::var("RECWRAP_DEFAULT_COMMAND")
                .ok()
                .filter(|s| !s.trim().is_empty())
        })
        .unwrap_or_else(|| DEFAULT_CAPTURE_COMMAND.to_string());
    let build_argv: Vec<String> = matches
        .get_many::<String>("build")
        .map(|i| i.cloned().collect())
        .unwrap_or_default();

    Config {
        help: matches.get_flag("help"),
        verbose: matches.get_flag("verbose"),
        command: matches
            .get_one::<String>("command")
            .cloned()
            .unwrap_or_default(),
        default_command,
        output_template: matches
            .get_one::<String>("output")
            .cloned()
            .unwrap_or_else(|| DEFAULT_OUTPUT_TEMPLATE.to_string()),
        no_fail_on_error: matches.get_flag("no-fail-on-error"),
        warmup_ms: matches
            .get_one::<u64>("warmup-ms")
            .copied()
            .unwrap_or(DEFAULT_WARMUP_MS),
        drain_ms: matches
            .get_one::<u64>("drain-ms")
            .copied()
            .unwrap_or(DEFAULT_DRAIN_MS),
        archive_dir: matches.get_one::<String>("archive-dir").cloned(),
        build_argv,
    }
}

/// コマンドラインを解析する。補完生成が要求された場合は ParseOutcome::GenerateCompletion を返す。
pub fn parse_args() -> Result<ParseOutcome, Error> {
    let cmd = build_clap_command();
    let matches = cmd
        .try_get_matches()
        .map_err(|e| Error::invalid_argument(e.to_string()))?;

    if let Some(&shell) = matches.get_one::<Shell>("generate") {
        return Ok(ParseOutcome::GenerateCompletion(shell));
    }

    Ok(ParseOutcome::Config(matches_to_config(&matches)))
}

/// テスト用: 引数スライスから解析する
#[allow(dead_code)]
pub fn parse_args_from(args: &[String]) -> Result<Config, Error> {
    let cmd = build_clap_command();
    let matches = cmd
        .try_get_matches_from(args)
        .map_err(|e| Error::invalid_argument(e.to_string()))?;
    Ok(matches_to_config(&matches))
}

/// 補完スクリプトを標準出力に出力する。
pub fn print_completion(shell: Shell) {
    let mut cmd = build_clap_command();
    clap_complete::generate(shell, &mut cmd, "recwrap", &mut std::io::stdout());
}
