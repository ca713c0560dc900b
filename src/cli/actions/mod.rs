pub mod seed;
pub mod server;

use anyhow::Result;

#[derive(Debug)]
pub enum Action {
    Server(server::Args),
    Seed(seed::Args),
}

impl Action {
    /// Execute the selected action.
    ///
    /// # Errors
    /// Returns an error if the underlying action fails.
    pub async fn execute(self) -> Result<()> {
        match self {
            Self::Server(args) => server::execute(args).await,
            Self::Seed(args) => seed::execute(args).await,
        }
    }
}
