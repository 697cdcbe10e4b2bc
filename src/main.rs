// Main entry point that forwards to the tile-forge-app library
fn main() {
    // Exit with the same code as the app
    std::process::exit(match tile_forge_app::run() {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {e:#}");
            1
        }
    });
}
