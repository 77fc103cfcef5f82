use std::io;
use std::path::PathBuf;

use snafu::prelude::*;
use tracing::{debug, info};

use crate::application::RuntimeConfig;
use crate::filesystem::{TreeBuilder, TreeLoadError};
use crate::navigator::Navigator;
use crate::shell::{Shell, ShellError};

pub struct Application;

impl Application {
    pub async fn run(app_config: impl Into<RuntimeConfig>) -> Result<(), ApplicationError> {
        let app_config: RuntimeConfig = app_config.into();
        debug!("Runtime config: {:?}", app_config);

        let build = TreeBuilder::new(app_config.indent_policy)
            .from_path(&app_config.description)
            .await
            .context(TreeLoadSnafu)?;
        if !build.anomalies.is_empty() {
            info!(
                "Skipped {} malformed lines while building the tree",
                build.anomalies.len()
            );
        }
        let root = build.root.context(NoRootDirectorySnafu {
            file_path: app_config.description.clone(),
        })?;

        let mut navigator = Navigator::new(&root);
        info!("Navigating tree rooted at '{}'", navigator.root().name());
        let stdin = io::stdin();
        let stdout = io::stdout();
        Shell::new(stdin.lock(), stdout.lock(), app_config.color)
            .run(&mut navigator)
            .context(SessionSnafu)?;

        Ok(())
    }
}

#[derive(Debug, Snafu)]
pub enum ApplicationError {
    #[snafu(display("Critical failure encountered while loading the tree"))]
    TreeLoadError { source: TreeLoadError },
    #[snafu(display("No root directory declared in {}", file_path.display()))]
    NoRootDirectory { file_path: PathBuf },
    #[snafu(display("Critical failure encountered during the interactive session"))]
    SessionError { source: ShellError },
}
