use anyhow::Context;
use wahu_launcher::Launcher;

fn main() -> anyhow::Result<()> {
    wahu_launcher::logging::init();

    let launcher = Launcher::default();
    let code = match launcher.launch(std::env::args_os()) {
        Ok(code) => code,
        Err(err) if err.is_fatal() => std::process::abort(),
        Err(err) => {
            return Err(err).with_context(|| {
                format!(
                    "cannot start {}",
                    launcher.directive().module().to_string_lossy()
                )
            });
        }
    };
    std::process::exit(code)
}
