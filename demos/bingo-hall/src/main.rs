use bingo::prelude::*;
use tokio::io::{AsyncBufReadExt, BufReader};

// ---------------------------------------------------------------------------
// Operator console
// ---------------------------------------------------------------------------

const HELP: &str = "commands: draw | reset | status | game | help";

/// Reads operator commands from stdin until EOF.
async fn console(controller: GameController) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Ok(Some(line)) = lines.next_line().await {
        match line.trim() {
            "draw" => match controller.draw_next().await {
                Ok(DrawOutcome::Drawn(ball)) => println!("ball {ball}"),
                Ok(DrawOutcome::Exhausted) => println!("all 75 balls drawn"),
                Ok(DrawOutcome::GameOver) => println!("game over, reset first"),
                Err(e) => println!("draw failed: {e}"),
            },
            "reset" => match controller.reset_game().await {
                Ok(()) => println!("new game"),
                Err(e) => println!("reset failed: {e}"),
            },
            "status" => {
                let now = chrono::Local::now().naive_local();
                let status = controller.hub().status(now).await;
                print_json(&status);
            }
            "game" => match controller.hub().snapshot().await {
                Some(snapshot) => print_json(&snapshot),
                None => println!("no game yet"),
            },
            "help" => println!("{HELP}"),
            "" => {}
            other => println!("unknown command {other:?}; {HELP}"),
        }
    }
}

fn print_json(value: &impl serde::Serialize) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{text}"),
        Err(e) => println!("cannot render: {e}"),
    }
}

// ---------------------------------------------------------------------------
// Server bootstrap
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    bingo::init_tracing("info");

    let addr = std::env::var("BINGO_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

    let server = BingoServerBuilder::new()
        .bind(&addr)
        .build(TrustedNameAuthenticator)
        .await?;
    tracing::info!(addr = %server.local_addr()?, "bingo hall listening");
    println!("{HELP}");

    tokio::spawn(console(server.controller()));

    server.run().await?;
    Ok(())
}
