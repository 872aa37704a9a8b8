use anyhow::Result;
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use std::time::SystemTime;
use tokio::sync::{mpsc, watch};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use dialog_engine::app::{Config, Effect, EngineEvent, OutputRecord};
use dialog_engine::engine::CommandProcessor;
use dialog_engine::protocol::text::parse_number;
use dialog_engine::state::geometry::parse_position;
use dialog_engine::state::{CommandLineOption, DialogOptions, DialogState, ListItems};
use dialog_engine::watcher::{command_file, CommandFileWatcher};

/// Dialog Engine - command-file driven dialog state
#[derive(Parser)]
#[command(name = "dialog-engine")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(short, long)]
    log_level: Option<String>,

    /// Command file to watch (defaults to the configured path)
    #[arg(long)]
    commandfile: Option<PathBuf>,

    /// Print state snapshots and effects as JSON lines on stdout
    #[arg(long)]
    json: bool,

    #[command(flatten)]
    options: LaunchOptions,
}

/// Initial dialog content
#[derive(clap::Args)]
struct LaunchOptions {
    /// Dialog title
    #[arg(long)]
    title: Option<String>,
    /// Message body
    #[arg(long)]
    message: Option<String>,
    /// Message alignment (left, centre, right)
    #[arg(long)]
    alignment: Option<String>,
    /// Icon path or name
    #[arg(long)]
    icon: Option<String>,
    /// Centre the icon above the message
    #[arg(long)]
    centreicon: bool,
    /// Icon size
    #[arg(long)]
    iconsize: Option<String>,
    /// Icon alpha (0.0 - 1.0)
    #[arg(long)]
    iconalpha: Option<String>,
    /// Overlay icon path
    #[arg(long)]
    overlayicon: Option<String>,
    /// Banner image path
    #[arg(long)]
    bannerimage: Option<String>,
    /// Banner title text
    #[arg(long)]
    bannertext: Option<String>,
    /// Show a progress bar with this total
    #[arg(long)]
    progress: Option<String>,
    /// Progress bar label
    #[arg(long)]
    progresstext: Option<String>,
    /// Button 1 label
    #[arg(long)]
    button1text: Option<String>,
    /// Button 2 label
    #[arg(long)]
    button2text: Option<String>,
    /// Info button label
    #[arg(long)]
    infobuttontext: Option<String>,
    /// Info text shown beside the buttons
    #[arg(long)]
    infotext: Option<String>,
    /// Info box content
    #[arg(long)]
    infobox: Option<String>,
    /// Help message
    #[arg(long)]
    helpmessage: Option<String>,
    /// Main image path
    #[arg(long)]
    image: Option<String>,
    /// List row title (repeatable)
    #[arg(long)]
    listitem: Vec<String>,
    /// Video reference (path, youtubeid=, vimeoid=)
    #[arg(long)]
    video: Option<String>,
    /// Web content URL
    #[arg(long)]
    webcontent: Option<String>,
    /// Window width
    #[arg(long)]
    width: Option<String>,
    /// Window height
    #[arg(long)]
    height: Option<String>,
    /// Window position (e.g. topleft, bottom, centre)
    #[arg(long)]
    position: Option<String>,
    /// Window position offset
    #[arg(long)]
    positionoffset: Option<String>,
    /// Timer bar duration; disables button 1 while shown
    #[arg(long)]
    timer: Option<String>,
    /// Keep the timer but hide its bar
    #[arg(long)]
    hidetimerbar: bool,
}

fn option(value: Option<String>) -> CommandLineOption {
    value.map(CommandLineOption::with_value).unwrap_or_default()
}

fn flag(present: bool) -> CommandLineOption {
    CommandLineOption {
        value: String::new(),
        present,
    }
}

impl LaunchOptions {
    fn into_state(self) -> DialogState {
        let rows = ListItems::from_titles(self.listitem);
        let options = DialogOptions {
            title: option(self.title),
            message: option(self.message),
            message_alignment: option(self.alignment),
            icon: option(self.icon),
            centre_icon: flag(self.centreicon),
            icon_size: option(self.iconsize),
            icon_alpha: option(self.iconalpha),
            overlay_icon: option(self.overlayicon),
            banner_image: option(self.bannerimage),
            banner_title: flag(self.bannertext.is_some()),
            banner_text: option(self.bannertext),
            progress_bar: option(self.progress),
            progress_text: option(self.progresstext),
            button1_text: option(self.button1text),
            button2_text: option(self.button2text),
            info_button_text: option(self.infobuttontext),
            info_text: option(self.infotext),
            info_box: option(self.infobox),
            help_message: option(self.helpmessage),
            main_image: option(self.image),
            video: option(self.video),
            webcontent: option(self.webcontent),
            position_offset: option(self.positionoffset),
            timer_bar: option(self.timer),
            hide_timer_bar: flag(self.hidetimerbar),
            list_item: flag(!rows.is_empty()),
            ..Default::default()
        };

        let mut state = DialogState::new(options);
        state.list_items = rows;
        if let Some(width) = self.width.as_deref().and_then(parse_number) {
            state.window.width = width;
        }
        if let Some(height) = self.height.as_deref().and_then(parse_number) {
            state.window.height = height;
        }
        if let Some(position) = &self.position {
            let (vertical, horizontal) = parse_position(position);
            state.window.vertical = vertical;
            state.window.horizontal = horizontal;
        }
        state
    }
}

fn main() -> Result<()> {
    // 起動時刻より前に書かれたコマンドは無視する
    let launch_time = SystemTime::now();
    let cli = Cli::parse();

    let config = Config::load().unwrap_or_default();

    // ログ初期化
    let level = cli.log_level.as_deref().unwrap_or(&config.log_level);
    init_logging(level)?;

    let command_file = cli.commandfile.clone().unwrap_or_else(|| config.command_file.clone());
    let emit_json = cli.json || config.emit_json;
    let state = cli.options.into_state();

    let runtime = tokio::runtime::Runtime::new()?;
    let exit_code = runtime.block_on(run_dialog(
        config,
        command_file,
        state,
        launch_time,
        emit_json,
    ))?;
    drop(runtime);

    info!("Dialog Engine exiting with code {}", exit_code);
    std::process::exit(exit_code)
}

fn init_logging(level: &str) -> Result<()> {
    let log_dir = directories::ProjectDirs::from("", "", "dialog-engine")
        .map(|d| d.data_dir().to_path_buf())
        .unwrap_or_else(|| std::env::temp_dir().join("dialog-engine"));

    std::fs::create_dir_all(&log_dir)?;
    let log_file = std::fs::File::create(log_dir.join("dialog-engine.log"))?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(log_file))
        .init();

    info!("Dialog Engine starting");
    Ok(())
}

async fn run_dialog(
    config: Config,
    command_file: PathBuf,
    state: DialogState,
    launch_time: SystemTime,
    emit_json: bool,
) -> Result<i32> {
    let (event_tx, event_rx) = mpsc::channel::<EngineEvent>(config.watcher.channel_capacity);
    let (state_tx, mut state_rx) = watch::channel(state.clone());
    let (effect_tx, mut effect_rx) = mpsc::channel::<Effect>(config.watcher.channel_capacity);

    if emit_json {
        emit(&OutputRecord::State { state: &state })?;
    }

    // コマンドファイルの準備と監視（失敗してもダイアログは継続）
    let watcher_handle = match command_file::prepare(&command_file) {
        Ok(()) => {
            let watcher = CommandFileWatcher::new(command_file.clone(), config.watcher.clone());
            Some(tokio::spawn(async move {
                if let Err(e) = watcher.run(event_tx).await {
                    error!("Command file updates disabled: {:#}", e);
                }
            }))
        }
        Err(e) => {
            warn!("Command file updates disabled: {:#}", e);
            None
        }
    };

    let processor = CommandProcessor::new(state, launch_time);
    let engine_handle = tokio::spawn(processor.run(event_rx, state_tx, effect_tx));

    let mut exit_code = 0;
    let mut engine_running = true;
    loop {
        tokio::select! {
            changed = state_rx.changed(), if engine_running => {
                // 更新が止まってもダイアログは表示し続ける
                if changed.is_err() {
                    warn!("Command processor stopped, dialog state is now fixed");
                    engine_running = false;
                    continue;
                }
                if emit_json {
                    let state = state_rx.borrow_and_update().clone();
                    emit(&OutputRecord::State { state: &state })?;
                }
            }
            Some(effect) = effect_rx.recv() => {
                if emit_json {
                    emit(&OutputRecord::Effect { effect: &effect })?;
                }
                match effect {
                    Effect::Reposition { width, height, vertical, horizontal, offset } => {
                        info!(
                            "Reposition window: {}x{} {:?}/{:?} offset {}",
                            width, height, vertical, horizontal, offset
                        );
                    }
                    Effect::Activate => info!("Activate window"),
                    Effect::Quit { exit_code: code } => {
                        info!("Quit requested from command file");
                        exit_code = code;
                        break;
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted");
                break;
            }
        }
    }

    // 監視を停止してファイルハンドルを閉じる
    if let Some(handle) = watcher_handle {
        handle.abort();
    }
    engine_handle.abort();

    Ok(exit_code)
}

fn emit(record: &OutputRecord<'_>) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer(&mut stdout, record)?;
    writeln!(stdout)?;
    stdout.flush()?;
    Ok(())
}
