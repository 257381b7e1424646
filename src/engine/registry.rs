//! Game registry.
//!
//! Owns every live game, keyed by normalized code. The map lock is only
//! held to look a game up or insert one; all game logic runs under that
//! game's own mutex, so concurrent submissions to the same game are
//! serialized while different games never contend.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::catalog::Catalog;
use crate::config::GameSettings;
use crate::engine::game::{normalize_code, Game};
use crate::engine::view::{public_view, GameView};
use crate::types::{ActionRequest, GameCode, GameError, Player};

pub type SharedGame = Arc<Mutex<Game>>;

pub struct GameRegistry {
    settings: GameSettings,
    catalog: Catalog,
    games: RwLock<HashMap<GameCode, SharedGame>>,
}

impl GameRegistry {
    pub fn new(settings: GameSettings, catalog: Catalog) -> Self {
        Self {
            settings,
            catalog,
            games: RwLock::new(HashMap::new()),
        }
    }

    /// Create a game under a host-chosen code, drawing its items from the
    /// catalog. Returns the normalized code and the seated host.
    pub async fn create(&self, code: &str, host_name: &str) -> Result<(GameCode, Player), GameError> {
        let items = self.catalog.draw(self.settings.rounds, &mut rand::rng());
        let (game, host) = Game::create(code, host_name, items, self.settings.clone())?;
        let id = game.id().to_string();

        let mut games = self.games.write().await;
        if games.contains_key(&id) {
            return Err(GameError::CodeTaken);
        }
        games.insert(id.clone(), Arc::new(Mutex::new(game)));
        Ok((id, host))
    }

    /// Handle to a game, looked up by raw (un-normalized) code.
    pub async fn get(&self, code: &str) -> Result<SharedGame, GameError> {
        let id = normalize_code(code, self.settings.code_max_len);
        self.games
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(GameError::GameNotFound)
    }

    /// Run `f` with exclusive access to one game.
    pub async fn with_game<T>(
        &self,
        code: &str,
        f: impl FnOnce(&mut Game) -> Result<T, GameError>,
    ) -> Result<T, GameError> {
        let game = self.get(code).await?;
        let mut game = game.lock().await;
        f(&mut game)
    }

    pub async fn join(&self, code: &str, name: &str) -> Result<(GameCode, Player), GameError> {
        self.with_game(code, |g| Ok((g.id().to_string(), g.join(name)?)))
            .await
    }

    pub async fn start(&self, code: &str) -> Result<(), GameError> {
        self.with_game(code, Game::start).await
    }

    /// Submit and, if the round is now complete, resolve in the same
    /// critical section.
    pub async fn submit_action(
        &self,
        code: &str,
        player_id: &str,
        request: ActionRequest,
    ) -> Result<bool, GameError> {
        self.with_game(code, |g| g.submit_action(player_id, request))
            .await
    }

    pub async fn force_resolve(&self, code: &str) -> Result<(), GameError> {
        self.with_game(code, Game::force_resolve).await
    }

    pub async fn advance(&self, code: &str) -> Result<(), GameError> {
        self.with_game(code, Game::advance).await
    }

    pub async fn host_advance(&self, code: &str) -> Result<(), GameError> {
        self.with_game(code, Game::host_advance).await
    }

    pub async fn view(&self, code: &str, player_id: Option<&str>) -> Result<GameView, GameError> {
        self.with_game(code, |g| Ok(public_view(g, player_id)))
            .await
    }

    /// Clone every game, e.g. for a snapshot on shutdown.
    pub async fn snapshot(&self) -> Vec<Game> {
        let handles: Vec<SharedGame> = self.games.read().await.values().cloned().collect();
        let mut games = Vec::with_capacity(handles.len());
        for handle in handles {
            games.push(handle.lock().await.clone());
        }
        games.sort_by(|a, b| a.id().cmp(b.id()));
        games
    }

    /// Replace all games with `games`.
    ///
    /// A game whose code is no longer valid under the current code rules
    /// could never be looked up again, so it is dropped.
    pub async fn restore(&self, games: Vec<Game>) {
        let mut restored: HashMap<GameCode, SharedGame> = HashMap::with_capacity(games.len());
        for game in games {
            let id = game.id().to_string();
            if id.len() < self.settings.code_min_len
                || normalize_code(&id, self.settings.code_max_len) != id
            {
                warn!(game = %id, "Saved game code no longer valid, skipping");
                continue;
            }
            debug!(game = %id, phase = %game.phase(), created_at = %game.created_at(), "Game restored");
            restored.insert(id, Arc::new(Mutex::new(game)));
        }
        let count = restored.len();
        *self.games.write().await = restored;
        info!(games = count, "Games restored");
    }
}
