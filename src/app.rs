use anyhow::Result;

use crate::{
    api,
    cli::{Cli, Command},
    domain,
    infra::{self, error::AppError},
    ui::{self, console::Console, terminal::StdTerminal},
    usecases::{self, bootstrap},
};

const SESSION_RESUME_FAILED: &str = "SESSION_RESUME_FAILED";

pub fn run(cli: Cli) -> Result<()> {
    let context = bootstrap::bootstrap(cli.config.as_deref())?;

    tracing::debug!(
        ui = ui::module_name(),
        domain = domain::module_name(),
        api = api::module_name(),
        usecases = usecases::module_name(),
        infra = infra::module_name(),
        "module boundaries loaded"
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(AppError::Runtime)?;
    let engine = bootstrap::compose_engine(&context);

    runtime.block_on(async {
        match cli.command_or_default() {
            Command::Run => {
                if context.config.session.resume_on_start {
                    if let Err(error) = engine.sessions.resume().await {
                        tracing::warn!(
                            code = SESSION_RESUME_FAILED,
                            error = %error,
                            "could not restore stored session"
                        );
                    }
                }

                let mut terminal = StdTerminal;
                Console::new(&mut terminal, &engine).run().await?;
            }
            Command::Rooms => {
                let rooms = engine.directory.list_chatrooms().await;
                if rooms.is_empty() {
                    println!("No chatrooms available.");
                }
                for room in rooms {
                    println!("{room}");
                }
            }
            Command::Logout => {
                engine.sessions.clear_secrets().await?;
                tracing::info!("stored credentials removed");
                println!("Logged out. Stored credentials were removed.");
            }
        }

        Ok::<(), anyhow::Error>(())
    })
}
