#![warn(rust_2018_idioms)]

use mahjong_photo::app;
use mahjong_photo::error::Res;
use mahjong_photo::model::ErrorResponse;
use mahjong_photo::util::log::init_tracing;
use tracing::error;

fn main() {
    init_tracing("info");

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        error!("mode not specified");
        std::process::exit(1);
    }

    let args2 = args[2..].to_vec();
    let res: Res = match args[1].as_str() {
        "C" => {
            // Calculator (写真の検出結果から点数計算)
            app::CalculatorApp::new(args2).run()
        }
        "T" => {
            // Tile (牌1枚の認識)
            app::TileApp::new(args2).run()
        }
        m => {
            error!("unknown mode: {}", m);
            std::process::exit(1);
        }
    };

    if let Err(e) = res {
        error!("{}", e);
        if let Ok(s) = serde_json::to_string(&ErrorResponse::from(&e)) {
            println!("{}", s);
        }
        std::process::exit(1);
    }
}
