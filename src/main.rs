use std::process::ExitCode;

use clap::Parser;
use log::error;

use rustergl::cli::Cli;
use rustergl::gltf;
use rustergl::render::render;

fn run() -> rustergl::error::Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => log::LevelFilter::Info,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new().filter_level(level).init();

    let draw_calls = gltf::load(&cli.model)?;
    let options = cli.render_options();
    let (bitmap, _camera, _options) = render(&draw_calls, options)?;

    image::save_buffer(
        &cli.out,
        bitmap.as_bytes(),
        bitmap.width(),
        bitmap.height(),
        image::ColorType::Rgba8,
    )?;

    Ok(())
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
