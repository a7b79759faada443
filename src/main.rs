use anyhow::Result;
use clap::Parser;

use bayesboard_lib::app::{spawn_snapshot_consumer, App, KeyPress, KeyScript, RunMode, ShutdownManager};
use bayesboard_lib::model::config::AppConfig;
use bayesboard_lib::model::naming::title_case;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// How ticks are paced
    #[arg(short, long, value_enum, default_value = "realtime")]
    mode: RunMode,

    /// Custom config file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Game seed, overriding the config file
    #[arg(short, long)]
    seed: Option<String>,

    /// Stop after this many ticks
    #[arg(short, long)]
    ticks: Option<u64>,

    /// Show node roles instead of node colors
    #[arg(long)]
    cheat: bool,

    /// Print one JSON snapshot per tick on stdout
    #[arg(long)]
    json: bool,

    /// Scripted key press, KEY:FROM-TO in game milliseconds (repeatable)
    #[arg(short, long = "press", value_name = "KEY:FROM-TO")]
    presses: Vec<KeyPress>,
}

#[tokio::main]
async fn main() -> Result<()> {
    bayesboard_core::init_logging();
    let args = Args::parse();

    let mut config = AppConfig::load(&args.config)?;
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    if args.cheat {
        config.board.cheat_mode = true;
    }

    let mut app = App::new(config, args.mode, KeyScript::new(args.presses))?;
    let mut shutdown = ShutdownManager::new();
    // The JSON summary line replaces the logged report.
    shutdown.set_report_on_exit(!args.json);
    shutdown.listen_for_ctrl_c();

    let (tx, consumer) = spawn_snapshot_consumer(args.json);

    let res = app.run(&shutdown, args.ticks, Some(tx)).await;
    if res.is_err() {
        shutdown.set_exit_code(1);
    }
    shutdown.cleanup(&mut app)?;

    consumer.await?;

    if args.json {
        println!(
            "{}",
            serde_json::json!({
                "seed": app.seed(),
                "ticks": app.game.tick_count(),
                "score": app.game.score(),
                "board": app.board.summary(),
            })
        );
    } else {
        println!(
            "{}: {} points after {} ticks",
            title_case(app.seed()),
            app.game.score(),
            app.game.tick_count()
        );
    }

    if let Err(e) = res {
        eprintln!("Game error: {e}");
        std::process::exit(shutdown.exit_code());
    }
    Ok(())
}
