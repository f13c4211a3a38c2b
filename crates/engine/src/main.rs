use std::io::{BufRead, Write};

use scenecraft_engine::command::Interpreter;
use scenecraft_engine::services::{
    load_texture_catalog, ClaudeTranslator, HttpModelCatalog, HttpTextureProvider,
};
use scenecraft_engine::state::AppState;

const DEFAULT_TEXTURE_API: &str = "https://3-dai-app.vercel.app/api/textures";
const DEFAULT_MODEL_API: &str = "https://3-dai-app.vercel.app/api";

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "scenecraft=info".into()),
        )
        .init();

    let mut state = AppState::new();

    let texture_api =
        std::env::var("SCENECRAFT_TEXTURE_API").unwrap_or_else(|_| DEFAULT_TEXTURE_API.into());
    let model_api =
        std::env::var("SCENECRAFT_MODEL_API").unwrap_or_else(|_| DEFAULT_MODEL_API.into());

    tracing::info!("loading texture catalog from {texture_api}");
    let textures = HttpTextureProvider::new(texture_api);
    load_texture_catalog(&textures, &mut state.textures).await;

    let mut interpreter = Interpreter::new(Box::new(HttpModelCatalog::new(model_api)));
    match ClaudeTranslator::from_env() {
        Some(translator) => {
            tracing::info!("natural-language translation enabled");
            interpreter = interpreter.with_translator(Box::new(translator));
        }
        None => {
            tracing::info!("ANTHROPIC_API_KEY not set, accepting DSL commands only");
        }
    }

    println!("scenecraft: type commands, `help`, or `quit`");
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();

    loop {
        print!("> ");
        if stdout.flush().is_err() {
            break;
        }
        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let line = line.trim();

        match line {
            "" => continue,
            "quit" | "exit" => break,
            "help" => {
                print_help();
                continue;
            }
            _ => {}
        }

        // `pick <n>` and `cancel` resolve a pending model search
        let status = if let Some(n) = line.strip_prefix("pick ") {
            match n.trim().parse::<usize>() {
                Ok(index) if index >= 1 => interpreter.pick_model(&mut state, index - 1),
                _ => "Pick requires a candidate number (e.g., \"pick 1\")".to_string(),
            }
        } else if line == "cancel" {
            interpreter.cancel_model_search(&mut state)
        } else {
            interpreter.execute(&mut state, line).await
        };

        println!("{status}");
        if let Some(results) = state.model_search.results() {
            for (i, hit) in results.models.iter().enumerate() {
                println!("  {}. {} ({})", i + 1, hit.name, hit.source);
            }
            println!("  choose with `pick <n>` or `cancel`");
        }
    }
}

fn print_help() {
    println!(
        "commands:
  create <cube|sphere|cylinder> [color] [at x y z]
  create terrain <heightmap1-5> [grass <key>] [mud <key>] [rock <key>] [heightmap <1-5>] [at x y z]
  create model <term> [at x y z]     then: pick <n> | cancel
  clone|duplicate|copy [at x y z]
  select all|none|cubes|spheres|cylinders|<name>
  delete|remove selected|<name>
  scale selected|<name> <v> | <vx vy vz>
  rotate selected|<name> <deg> | <dx dy dz>
  move selected|<name> to|by <x y z>
  change texture <grass|mud|rock|heightmap> <index|next|prev>
  clear | reset | quit"
    );
}
