#![warn(missing_docs)]
//! # brandlens binary
//!
//! Desktop shell entry point: initializes logging and runs the egui shell.

mod shell;

use shell::BrandlensShell;

fn main() -> eframe::Result<()> {
    env_logger::init();
    log::info!("brandlens {} starting", brandlens_app::app_version());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 780.0])
            .with_min_inner_size([820.0, 600.0])
            .with_title(format!("brandlens {}", brandlens_app::app_version())),
        ..Default::default()
    };

    eframe::run_native(
        "brandlens",
        options,
        Box::new(|_cc| Ok(Box::new(BrandlensShell::new()?))),
    )
}
