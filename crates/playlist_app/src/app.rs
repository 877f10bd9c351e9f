use std::io::Write;
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use chrono::Utc;
use engine_logging::{engine_info, engine_warn};
use playlist_core::{
    playback_target, Action, PlaybackTarget, Playlist, PlaylistCardView, PlaylistProgress,
    Rejection, Store,
};
use playlist_engine::{CatalogSettings, EngineEvent, EngineHandle, FileStore, IngestRequest};

use crate::cli::Command;

/// Command-line front end over the playlist store.
pub struct App {
    store: Store<FileStore>,
    settings: CatalogSettings,
}

impl App {
    pub fn open(data_dir: &Path, settings: CatalogSettings) -> Result<Self> {
        let storage = FileStore::open(data_dir.to_path_buf())
            .with_context(|| format!("cannot use data directory {}", data_dir.display()))?;
        Ok(Self {
            store: Store::bootstrap(storage),
            settings,
        })
    }

    pub fn run(&mut self, command: Command, out: &mut dyn Write) -> Result<()> {
        match command {
            Command::SetKey { key } => {
                self.store.dispatch(Action::SetCredential(key))?;
                writeln!(out, "API key saved.")?;
            }
            Command::Add { url } => self.add(&url, out)?,
            Command::List => self.list(out)?,
            Command::Select { id } => {
                self.store.dispatch(Action::SetActivePlaylist(id.clone()))?;
                writeln!(out, "Active playlist: {}", self.title_of(&id))?;
            }
            Command::Remove { id } => {
                if !self.store.state().contains(&id) {
                    return Err(Rejection::UnknownPlaylist(id).into());
                }
                let title = self.title_of(&id);
                self.store.dispatch(Action::RemovePlaylist(id))?;
                writeln!(out, "Removed {title}.")?;
            }
            Command::Favorite { id } => {
                self.store.dispatch(Action::ToggleFavorite(id.clone()))?;
                let state = self.store.state();
                let marker = if state.is_favorite(&id) {
                    "added to"
                } else {
                    "removed from"
                };
                writeln!(out, "{} {marker} favorites.", self.title_of(&id))?;
            }
            Command::Progress { id, index } => {
                let total = self.video_count(&id)?;
                self.record_progress(id, index, total)?;
                writeln!(out, "Progress saved: video {} of {total}.", index + 1)?;
            }
            Command::Watch { id, index } => self.watch(id, index, out)?,
        }
        Ok(())
    }

    fn add(&mut self, url: &str, out: &mut dyn Write) -> Result<()> {
        let state = self.store.state();
        let request = match IngestRequest::from_input(url, state.credential()) {
            Ok(request) => request,
            Err(err) => {
                engine_warn!("Rejected ingestion input {:?}: {}", url, err);
                bail!(err.user_message());
            }
        };

        let engine = EngineHandle::new(self.settings.clone()).map_err(|err| {
            engine_warn!("Failed to build catalog client: {}", err);
            anyhow!(err.user_message())
        })?;
        engine_info!("Loading playlist {}", request.playlist_id);
        engine.enqueue(1, request);

        let playlist = match engine.recv() {
            Some(EngineEvent::IngestCompleted { result: Ok(playlist), .. }) => playlist,
            Some(EngineEvent::IngestCompleted { result: Err(err), .. }) => {
                engine_warn!("Ingestion failed: {}", err);
                bail!(err.user_message());
            }
            None => bail!("Failed to load playlist"),
        };

        writeln!(
            out,
            "Added {} ({} videos) as {}.",
            playlist.title,
            playlist.videos.len(),
            playlist.id
        )?;
        self.store.dispatch(Action::AddPlaylist(playlist))?;
        Ok(())
    }

    fn list(&self, out: &mut dyn Write) -> Result<()> {
        let view = self.store.state().view();
        if !view.has_credential {
            writeln!(out, "No API key configured. Run `set-key <KEY>` first.")?;
        }
        if view.playlist_count() == 0 {
            writeln!(out, "No playlists yet. Add one with `add <URL>`.")?;
            return Ok(());
        }

        for (heading, cards) in [
            ("Favorites", &view.favorites),
            ("Recently watched", &view.recent),
            ("Playlists", &view.others),
        ] {
            if cards.is_empty() {
                continue;
            }
            writeln!(out, "{heading}:")?;
            for card in cards {
                writeln!(out, "  {}", format_card(card))?;
            }
        }
        Ok(())
    }

    fn watch(&mut self, id: String, index: Option<usize>, out: &mut dyn Write) -> Result<()> {
        let state = self.store.state();
        let playlist = state
            .playlist(&id)
            .ok_or_else(|| Rejection::UnknownPlaylist(id.clone()))?;
        if playlist.videos.is_empty() {
            bail!("{} has no videos", playlist.title);
        }

        let index = index
            .or_else(|| playlist.progress.as_ref().map(|p| p.current_video_index))
            .unwrap_or(0);
        let total = playlist.videos.len();
        let video = playlist.video(index).ok_or_else(|| {
            anyhow!(
                "{} has {total} videos; pick an index below that",
                playlist.title
            )
        })?;

        self.store.dispatch(Action::SetActivePlaylist(id.clone()))?;
        writeln!(out, "Video {} of {total}: {}", index + 1, video.title)?;
        match playback_target(video) {
            PlaybackTarget::Embed { video_id } => {
                writeln!(out, "Embed: https://www.youtube.com/embed/{video_id}")?
            }
            PlaybackTarget::DeepLink { url } => {
                writeln!(out, "Embedding is disabled for this video. Watch on YouTube: {url}")?
            }
        }

        self.record_progress(id, index, total)
    }

    fn record_progress(&mut self, id: String, index: usize, total: usize) -> Result<()> {
        self.store.dispatch(Action::UpdateProgress {
            playlist_id: id,
            progress: PlaylistProgress {
                current_video_index: index,
                total_videos: total,
                last_watched: Utc::now(),
            },
        })?;
        Ok(())
    }

    fn video_count(&self, id: &str) -> Result<usize> {
        self.store
            .state()
            .playlist(id)
            .map(|playlist| playlist.videos.len())
            .ok_or_else(|| anyhow!("unknown playlist {id}"))
    }

    fn title_of(&self, id: &str) -> String {
        self.store
            .state()
            .playlist(id)
            .map(|playlist: &Playlist| playlist.title.clone())
            .unwrap_or_else(|| id.to_string())
    }
}

fn format_card(card: &PlaylistCardView) -> String {
    let mut line = format!("{} [{}] {} videos", card.title, card.id, card.video_count);
    if let Some(progress) = &card.progress {
        line.push_str(&format!(
            ", Video {} of {} ({}%)",
            progress.position, progress.total, progress.percent
        ));
    }
    if card.is_active {
        line.push_str(" *active*");
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use playlist_core::{Video, STATE_KEY};
    use playlist_core::KeyValueStore;

    fn video(id: &str, embed_allowed: bool) -> Video {
        Video {
            id: id.to_string(),
            title: format!("Video {id}"),
            thumbnail: format!("https://i.ytimg.com/vi/{id}/mqdefault.jpg"),
            description: None,
            embed_allowed,
        }
    }

    fn playlist(id: &str, videos: Vec<Video>) -> Playlist {
        Playlist {
            id: id.to_string(),
            title: format!("Playlist {id}"),
            videos,
            thumbnail: None,
            description: None,
            progress: None,
            last_accessed: None,
        }
    }

    fn open(dir: &Path) -> App {
        App::open(dir, CatalogSettings::default()).unwrap()
    }

    fn run(app: &mut App, command: Command) -> Result<String> {
        let mut out = Vec::new();
        app.run(command, &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    fn seeded(dir: &Path) -> App {
        let mut app = open(dir);
        app.store
            .dispatch(Action::AddPlaylist(playlist(
                "PL1",
                vec![video("a", true), video("b", false), video("c", true)],
            )))
            .unwrap();
        app.store
            .dispatch(Action::AddPlaylist(playlist("PL2", vec![video("d", true)])))
            .unwrap();
        app
    }

    #[test]
    fn add_without_key_asks_for_configuration() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = open(dir.path());
        let err = run(
            &mut app,
            Command::Add {
                url: "https://www.youtube.com/playlist?list=PL1".into(),
            },
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "Please configure your YouTube API key first");
    }

    #[test]
    fn add_with_invalid_url_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = open(dir.path());
        run(&mut app, Command::SetKey { key: "key".into() }).unwrap();
        let err = run(
            &mut app,
            Command::Add {
                url: "https://www.youtube.com/watch?v=abc".into(),
            },
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "Invalid playlist URL");
    }

    #[test]
    fn key_survives_restart() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut app = open(dir.path());
            run(&mut app, Command::SetKey { key: "secret".into() }).unwrap();
        }
        let app = open(dir.path());
        assert_eq!(app.store.state().credential(), Some("secret"));
        let listing = {
            let mut out = Vec::new();
            app.list(&mut out).unwrap();
            String::from_utf8(out).unwrap()
        };
        assert!(!listing.contains("No API key configured"));
    }

    #[test]
    fn watch_embeds_first_video_and_records_progress() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = seeded(dir.path());
        let output = run(
            &mut app,
            Command::Watch {
                id: "PL1".into(),
                index: None,
            },
        )
        .unwrap();
        assert!(output.contains("Video 1 of 3: Video a"));
        assert!(output.contains("https://www.youtube.com/embed/a"));

        let state = app.store.state();
        assert_eq!(state.active_playlist_id(), Some("PL1"));
        let progress = state.playlist("PL1").unwrap().progress.clone().unwrap();
        assert_eq!(progress.current_video_index, 0);
        assert_eq!(progress.total_videos, 3);
    }

    #[test]
    fn watch_deep_links_when_embedding_is_disabled() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = seeded(dir.path());
        let output = run(
            &mut app,
            Command::Watch {
                id: "PL1".into(),
                index: Some(1),
            },
        )
        .unwrap();
        assert!(output.contains("https://www.youtube.com/watch?v=b"));
    }

    #[test]
    fn watch_resumes_from_saved_progress() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = seeded(dir.path());
        run(
            &mut app,
            Command::Progress {
                id: "PL1".into(),
                index: 2,
            },
        )
        .unwrap();
        let output = run(
            &mut app,
            Command::Watch {
                id: "PL1".into(),
                index: None,
            },
        )
        .unwrap();
        assert!(output.contains("Video 3 of 3: Video c"));
    }

    #[test]
    fn out_of_range_progress_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = seeded(dir.path());
        assert!(run(
            &mut app,
            Command::Progress {
                id: "PL2".into(),
                index: 5,
            },
        )
        .is_err());
        assert!(app.store.state().playlist("PL2").unwrap().progress.is_none());
    }

    #[test]
    fn select_unknown_playlist_fails_and_keeps_active() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = seeded(dir.path());
        let before = app.store.state().active_playlist_id().map(str::to_owned);
        assert!(run(&mut app, Command::Select { id: "nope".into() }).is_err());
        assert_eq!(
            app.store.state().active_playlist_id().map(str::to_owned),
            before
        );
    }

    #[test]
    fn remove_unknown_playlist_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = seeded(dir.path());
        let err = run(&mut app, Command::Remove { id: "nope".into() }).unwrap_err();
        assert_eq!(err.to_string(), "unknown playlist nope");
        assert_eq!(app.store.state().playlists().len(), 2);
    }

    #[test]
    fn watch_out_of_range_leaves_state_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = seeded(dir.path());
        let before = app.store.state();
        assert!(run(
            &mut app,
            Command::Watch {
                id: "PL2".into(),
                index: Some(99),
            },
        )
        .is_err());

        let after = app.store.state();
        assert_eq!(after.as_ref(), before.as_ref());
        assert_eq!(after.active_playlist_id(), Some("PL1"));
        assert!(after.playlist("PL2").unwrap().last_accessed.is_none());
    }

    #[test]
    fn list_groups_favorites_first() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = seeded(dir.path());
        run(&mut app, Command::Favorite { id: "PL2".into() }).unwrap();
        let output = run(&mut app, Command::List).unwrap();
        let favorites = output.find("Favorites:").unwrap();
        let pl2 = output.find("[PL2]").unwrap();
        let pl1 = output.find("[PL1]").unwrap();
        assert!(favorites < pl2 && pl2 < pl1);
    }

    #[test]
    fn remove_persists_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = seeded(dir.path());
        run(&mut app, Command::Remove { id: "PL1".into() }).unwrap();
        let stored = app.store.storage().get(STATE_KEY).unwrap().unwrap();
        assert!(!stored.contains("\"PL1\""));

        let reopened = open(dir.path());
        assert!(reopened.store.state().playlist("PL1").is_none());
        assert!(reopened.store.state().playlist("PL2").is_some());
    }
}
