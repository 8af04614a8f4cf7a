// ============================================
// Liquid Inspect - Сводка по файлу жидкости тайла
// ============================================

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use liquid_tiles::liquid::{global_liquid_types, LiquidTypeTable};
use liquid_tiles::{LiquidCodec, LoadPolicy, TileFile};

#[derive(Parser, Debug)]
#[command(name = "liquid-inspect", about = "Print the liquid layers stored in a tile file")]
struct Cli {
    /// Tile file (.lqt)
    tile: PathBuf,
    /// JSON table overriding the built-in liquid types
    #[arg(long)]
    liquids: Option<PathBuf>,
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    // Встроенные типы, поверх - переопределения из файла
    let mut types: LiquidTypeTable = global_liquid_types().clone();
    if let Some(path) = &cli.liquids {
        let count = types.load_from_file(path)?;
        log::info!("Loaded {} liquid type(s) from {}", count, path.display());
    }

    let codec = LiquidCodec::new(&types);
    let tile = TileFile::load(&cli.tile, &codec, LoadPolicy::SkipChunk)?;

    if !tile.has_any_liquid() {
        println!("tile ({}, {}): no liquid", tile.tile_x(), tile.tile_y());
        return Ok(());
    }
    println!(
        "tile ({}, {}): {} chunk(s) with liquid",
        tile.tile_x(),
        tile.tile_y(),
        tile.liquid_chunk_count()
    );

    for chunk in tile.chunks().filter(|c| c.has_data()) {
        let pos = chunk.position();
        println!("chunk ({}, {}): {} layer(s)", pos.x, pos.y, chunk.layer_count());

        for (slot, layer) in chunk.layers() {
            let name = types
                .get(layer.liquid_type())
                .map(|def| def.name.as_str())
                .unwrap_or("unknown");
            println!(
                "  [{}] type {} ({}), cells {} (mask {:016x}), height {:.2}..{:.2}",
                slot,
                layer.liquid_type(),
                name,
                layer.mask().count(),
                layer.mask().bits(),
                layer.min_height(),
                layer.max_height()
            );
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_args() {
        let cli = Cli::try_parse_from(["liquid-inspect", "maps/32_48.lqt", "--liquids", "my.json"]).unwrap();
        assert_eq!(cli.tile, PathBuf::from("maps/32_48.lqt"));
        assert_eq!(cli.liquids, Some(PathBuf::from("my.json")));

        let cli = Cli::try_parse_from(["liquid-inspect", "a.lqt"]).unwrap();
        assert!(cli.liquids.is_none());

        assert!(Cli::try_parse_from(["liquid-inspect"]).is_err());
        assert!(Cli::try_parse_from(["liquid-inspect", "a.lqt", "--liquids"]).is_err());
    }
}
