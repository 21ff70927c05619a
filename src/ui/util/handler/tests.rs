use std::{sync::Arc, time::Duration};

use tokio::time::sleep;

use super::*;
use crate::{
    config::Config,
    playback::RepeatState,
    prefs::{ACCESS_TOKEN_KEY, PreferenceStore, storage::Storage},
    testing::{Call, FakeApi, FakeLyrics, device, playing},
};

const LRC: &str = "[00:01.50]Hello\n[00:10.00]World";

struct Harness {
    app: App,
    api: Arc<FakeApi>,
    lyrics: Arc<FakeLyrics>,
}

fn harness(api: FakeApi, lyrics: FakeLyrics) -> Harness {
    let api = Arc::new(api);
    let lyrics = Arc::new(lyrics);
    let prefs = PreferenceStore::load(Storage::in_memory()).unwrap();
    let app = App::with_services(Config::default(), api.clone(), lyrics.clone(), prefs);
    Harness { app, api, lyrics }
}

impl Harness {
    async fn send(&mut self, event: Event) {
        EventHandler::handle_action(&mut self.app, event).await;
        self.settle().await;
    }

    async fn act(&mut self, action: Action) {
        EventHandler::dispatch_action(&mut self.app, action).await;
        self.settle().await;
    }

    /// Lets spawned requests finish and feeds their events back in.
    async fn settle(&mut self) {
        for _ in 0..8 {
            tokio::task::yield_now().await;
            while let Ok(event) = self.app.event_rx.try_recv() {
                EventHandler::handle_action(&mut self.app, event).await;
            }
        }
    }

    async fn play_track(&mut self, id: &str, progress_ms: u64) {
        self.send(Event::PlaybackFetched(Some(playing(id, progress_ms))))
            .await;
    }

    fn count(&self, matches: impl Fn(&Call) -> bool) -> usize {
        self.api.count(matches)
    }
}

#[tokio::test]
async fn toggling_lyrics_repeatedly_fetches_once() {
    let mut h = harness(FakeApi::new(), FakeLyrics::returning(LRC));
    h.play_track("t1", 0).await;

    h.send(Event::ToggleLyrics).await;
    h.send(Event::ToggleLyrics).await;
    h.send(Event::ToggleLyrics).await;

    assert_eq!(
        h.lyrics.calls(),
        vec![("Track t1".to_string(), "Artist".to_string())]
    );
    assert!(h.app.state.data.lyrics.is_visible());
    assert_eq!(h.app.state.data.lyrics.lines().len(), 2);
    assert!(h.app.task_manager.is_running(LYRICS_TICK));
}

#[tokio::test]
async fn hidden_lyrics_stop_the_tick() {
    let mut h = harness(FakeApi::new(), FakeLyrics::returning(LRC));
    h.play_track("t1", 0).await;

    h.send(Event::ToggleLyrics).await;
    assert!(h.app.task_manager.is_running(LYRICS_TICK));

    h.send(Event::ToggleLyrics).await;
    assert!(!h.app.task_manager.is_running(LYRICS_TICK));
}

#[tokio::test(start_paused = true)]
async fn the_tick_moves_the_highlight_as_playback_advances() {
    let mut h = harness(FakeApi::new(), FakeLyrics::returning(LRC));
    h.play_track("t1", 0).await;
    h.send(Event::ToggleLyrics).await;
    h.settle().await;
    assert_eq!(h.app.state.data.lyrics.active_index(), None);

    h.app
        .state
        .data
        .apply_snapshot(Some(playing("t1", 10_000)));
    assert_eq!(h.app.state.data.lyrics.active_index(), None);

    sleep(Duration::from_millis(150)).await;
    h.settle().await;
    assert_eq!(h.app.state.data.lyrics.active_index(), Some(1));
}

#[tokio::test]
async fn lyrics_stay_closed_when_disabled_in_settings() {
    let mut h = harness(FakeApi::new(), FakeLyrics::returning(LRC));
    h.app
        .state
        .prefs
        .set(Preference::LyricsMenu, false)
        .unwrap();
    h.play_track("t1", 0).await;

    h.send(Event::ToggleLyrics).await;

    assert!(!h.app.state.data.lyrics.is_visible());
    assert!(h.lyrics.calls().is_empty());
}

#[tokio::test]
async fn failed_lookup_shows_unavailable_and_is_not_retried() {
    let mut h = harness(FakeApi::new(), FakeLyrics::failing(404));
    h.play_track("t1", 0).await;

    h.send(Event::ToggleLyrics).await;
    assert!(h.app.state.data.lyrics.is_unavailable());

    h.send(Event::ToggleLyrics).await;
    h.send(Event::ToggleLyrics).await;
    assert_eq!(h.lyrics.calls().len(), 1);
    assert!(!h.app.task_manager.is_running(LYRICS_TICK));
}

#[tokio::test]
async fn late_lyrics_for_a_previous_track_are_dropped() {
    let mut h = harness(FakeApi::new(), FakeLyrics::returning(LRC));
    h.play_track("t2", 0).await;

    h.send(Event::LyricsFetched {
        track_id: "t1".to_string(),
        result: Ok(LRC.to_string()),
    })
    .await;

    assert!(h.app.state.data.lyrics.lines().is_empty());
}

#[tokio::test]
async fn track_change_checks_liked_status() {
    let mut h = harness(FakeApi::new().with_saved(true), FakeLyrics::returning(""));

    h.play_track("t1", 0).await;

    assert_eq!(h.count(|c| *c == Call::IsSaved("t1".to_string())), 1);
    assert_eq!(h.app.state.data.transport.liked, Some(true));
}

#[tokio::test]
async fn like_commits_after_the_service_confirms() {
    let mut h = harness(
        FakeApi::new().with_playback(playing("t1", 0)),
        FakeLyrics::returning(""),
    );
    h.play_track("t1", 0).await;
    assert_eq!(h.app.state.data.transport.liked, Some(false));

    EventHandler::handle_action(&mut h.app, Event::ToggleLike).await;
    assert_eq!(h.app.state.data.transport.liked, Some(false));

    h.settle().await;
    assert_eq!(h.count(|c| *c == Call::Save("t1".to_string())), 1);
    assert_eq!(h.app.state.data.transport.liked, Some(true));
}

#[tokio::test]
async fn shuffle_commits_only_after_success() {
    let mut h = harness(
        FakeApi::new().with_playback(playing("t1", 0)),
        FakeLyrics::returning(""),
    );
    h.play_track("t1", 0).await;

    EventHandler::handle_action(&mut h.app, Event::ToggleShuffle).await;
    assert!(!h.app.state.data.transport.is_shuffled);

    h.settle().await;
    assert!(h.app.state.data.transport.is_shuffled);
    assert_eq!(h.count(|c| *c == Call::Shuffle(true)), 1);
}

#[tokio::test]
async fn rejected_shuffle_leaves_the_display_alone() {
    let mut h = harness(FakeApi::new().failing(), FakeLyrics::returning(""));
    h.play_track("t1", 0).await;

    h.send(Event::ToggleShuffle).await;

    assert!(!h.app.state.data.transport.is_shuffled);
}

#[tokio::test]
async fn repeat_walks_the_cycle() {
    let mut h = harness(
        FakeApi::new().with_playback(playing("t1", 0)),
        FakeLyrics::returning(""),
    );
    h.play_track("t1", 0).await;

    let mut seen = Vec::new();
    for _ in 0..3 {
        h.send(Event::CycleRepeat).await;
        seen.push(h.app.state.data.transport.repeat);
    }

    assert_eq!(
        seen,
        vec![RepeatState::Context, RepeatState::Track, RepeatState::Off]
    );
}

#[tokio::test(start_paused = true)]
async fn volume_is_optimistic_and_the_indicator_hides_after_the_last_change() {
    let mut h = harness(FakeApi::new(), FakeLyrics::returning(""));
    h.play_track("t1", 0).await;
    h.send(Event::VolumeSample).await;
    assert_eq!(h.app.state.data.transport.volume, Some(50));

    EventHandler::handle_action(&mut h.app, Event::VolumeBy(7)).await;
    assert_eq!(h.app.state.data.transport.volume, Some(57));
    assert!(h.app.state.data.transport.volume_visible);
    h.settle().await;

    sleep(Duration::from_millis(1500)).await;
    h.send(Event::VolumeBy(7)).await;
    assert_eq!(h.app.state.data.transport.volume, Some(64));

    sleep(Duration::from_millis(1500)).await;
    h.settle().await;
    assert!(h.app.state.data.transport.volume_visible);

    sleep(Duration::from_millis(1000)).await;
    h.settle().await;
    assert!(!h.app.state.data.transport.volume_visible);
    assert_eq!(h.count(|c| matches!(c, Call::Volume(_))), 2);
}

#[tokio::test]
async fn volume_is_clamped() {
    let mut h = harness(FakeApi::new(), FakeLyrics::returning(""));
    h.app.state.data.transport.volume = Some(98);

    h.send(Event::VolumeBy(7)).await;
    assert_eq!(h.app.state.data.transport.volume, Some(100));

    h.app.state.data.transport.volume = Some(3);
    h.send(Event::VolumeBy(-7)).await;
    assert_eq!(h.app.state.data.transport.volume, Some(0));
    assert_eq!(h.count(|c| *c == Call::Volume(0)), 1);
}

#[tokio::test]
async fn skip_back_restarts_a_track_that_is_underway() {
    let mut h = harness(
        FakeApi::new().with_playback(playing("t1", 5_000)),
        FakeLyrics::returning(""),
    );
    h.play_track("t1", 5_000).await;

    h.send(Event::Previous).await;

    assert_eq!(h.count(|c| *c == Call::Seek(0)), 1);
    assert_eq!(h.count(|c| *c == Call::Previous), 0);
}

#[tokio::test]
async fn seeking_stays_inside_the_track() {
    let mut h = harness(FakeApi::new(), FakeLyrics::returning(""));
    h.play_track("t1", 195_000).await;
    h.send(Event::SeekBy(10_000)).await;

    h.play_track("t1", 4_000).await;
    h.send(Event::SeekBy(-10_000)).await;

    assert_eq!(h.count(|c| *c == Call::Seek(200_000)), 1);
    assert_eq!(h.count(|c| *c == Call::Seek(0)), 1);
}

#[tokio::test]
async fn play_without_devices_reports_an_error() {
    let mut h = harness(FakeApi::new(), FakeLyrics::returning(""));

    h.send(Event::TogglePlayPause).await;

    assert_eq!(
        h.app.state.ui.error_message.as_deref(),
        Some("No devices available for playback")
    );
    assert_eq!(h.count(|c| matches!(c, Call::Transfer(..))), 0);
}

#[tokio::test]
async fn play_without_a_session_transfers_to_a_device() {
    let mut h = harness(
        FakeApi::new().with_devices(vec![device("d1", false, None), device("d2", true, None)]),
        FakeLyrics::returning(""),
    );

    h.send(Event::TogglePlayPause).await;

    assert_eq!(h.count(|c| *c == Call::Transfer("d2".to_string(), true)), 1);
    assert!(h.app.state.ui.error_message.is_none());
}

#[tokio::test]
async fn duplicate_add_waits_for_confirmation() {
    let mut h = harness(
        FakeApi::new().with_playlist_pages("p1", vec![vec!["a"], vec!["t1"]]),
        FakeLyrics::returning(""),
    );
    h.play_track("t1", 0).await;

    h.act(Action::CloseWith(Event::AddToPlaylist {
        playlist_id: "p1".to_string(),
        playlist_name: "Mix".to_string(),
    }))
    .await;

    assert_eq!(h.app.router.overlay_kind(), Some(Overlay::ConfirmDuplicate));
    assert_eq!(
        h.app.state.data.pending_add,
        Some(PendingPlaylistAdd {
            playlist_id: "p1".to_string(),
            playlist_name: "Mix".to_string(),
            track_id: "t1".to_string(),
        })
    );
    assert_eq!(h.count(|c| matches!(c, Call::AddToPlaylist(..))), 0);

    // The captured track is added even if playback moved on meanwhile.
    h.play_track("t2", 0).await;
    h.act(Action::CloseWith(Event::AddAnyway)).await;

    assert_eq!(
        h.api.calls().last(),
        Some(&Call::AddToPlaylist(
            "p1".to_string(),
            vec!["spotify:track:t1".to_string()]
        ))
    );
    assert!(!h.app.router.has_overlay());
    assert!(h.app.state.data.pending_add.is_none());
    assert_eq!(h.app.state.ui.status_message.as_deref(), Some("Added to Mix"));
}

#[tokio::test]
async fn escape_discards_a_pending_duplicate() {
    let mut h = harness(
        FakeApi::new().with_playlist_pages("p1", vec![vec!["t1"]]),
        FakeLyrics::returning(""),
    );
    h.play_track("t1", 0).await;
    h.send(Event::AddToPlaylist {
        playlist_id: "p1".to_string(),
        playlist_name: "Mix".to_string(),
    })
    .await;
    assert!(h.app.router.has_overlay());

    h.send(Event::EscapePressed).await;

    assert!(!h.app.router.has_overlay());
    assert!(h.app.state.data.pending_add.is_none());
    assert_eq!(h.count(|c| matches!(c, Call::AddToPlaylist(..))), 0);
}

#[tokio::test]
async fn new_track_is_added_straight_away() {
    let mut h = harness(
        FakeApi::new().with_playlist_pages("p1", vec![vec!["a"]]),
        FakeLyrics::returning(""),
    );
    h.play_track("t1", 0).await;

    h.send(Event::AddToPlaylist {
        playlist_id: "p1".to_string(),
        playlist_name: "Mix".to_string(),
    })
    .await;

    assert_eq!(h.count(|c| matches!(c, Call::AddToPlaylist(..))), 1);
    assert!(!h.app.router.has_overlay());
}

#[tokio::test]
async fn first_playlist_image_is_remembered() {
    let mut h = harness(FakeApi::new(), FakeLyrics::returning(""));

    h.send(Event::PlaylistsFetched(vec![PlaylistSummary {
        id: "p1".to_string(),
        name: "Mix".to_string(),
        owner_id: "me".to_string(),
        image_url: Some("https://img/p1".to_string()),
        track_count: 3,
    }]))
    .await;

    assert_eq!(
        h.app.state.prefs.storage().get(LIBRARY_IMAGE_KEY),
        Some("https://img/p1")
    );
    assert_eq!(h.app.state.data.playlists.as_ref().map(Vec::len), Some(1));
}

#[tokio::test]
async fn sign_out_clears_credentials_and_quits() {
    let mut h = harness(FakeApi::new(), FakeLyrics::returning(""));
    h.app
        .state
        .prefs
        .storage_mut()
        .set(ACCESS_TOKEN_KEY, "token")
        .unwrap();

    h.send(Event::SignOut).await;

    assert!(h.app.should_quit);
    assert_eq!(h.app.state.prefs.storage().get(ACCESS_TOKEN_KEY), None);
    assert!(h.app.state.prefs.get(Preference::LyricsMenu));
}

#[tokio::test]
async fn disabling_the_lyrics_option_closes_the_panel() {
    let mut h = harness(FakeApi::new(), FakeLyrics::returning(LRC));
    h.play_track("t1", 0).await;
    h.send(Event::ToggleLyrics).await;

    h.send(Event::TogglePreference(Preference::LyricsMenu)).await;

    assert!(!h.app.state.prefs.get(Preference::LyricsMenu));
    assert!(!h.app.state.data.lyrics.is_visible());
    assert!(!h.app.task_manager.is_running(LYRICS_TICK));
}

#[tokio::test(start_paused = true)]
async fn timers_poll_playback_until_shutdown() {
    let mut h = harness(
        FakeApi::new().with_playback(playing("t1", 0)),
        FakeLyrics::returning(""),
    );

    h.send(Event::Initialize).await;
    assert!(h.app.state.data.playback.is_current("t1"));

    sleep(Duration::from_millis(1000)).await;
    h.settle().await;
    assert!(h.count(|c| *c == Call::CurrentPlayback) >= 2);

    h.app.shutdown();
    assert!(!h.app.task_manager.is_running(PLAYBACK_POLL));
    assert!(!h.app.task_manager.is_running(VOLUME_SAMPLE));
}

#[tokio::test(start_paused = true)]
async fn device_volume_is_sampled_every_five_seconds() {
    let mut h = harness(
        FakeApi::new().with_playback(playing("t1", 0)),
        FakeLyrics::returning(""),
    );
    h.send(Event::Initialize).await;

    let mut louder = playing("t1", 0);
    louder.device = Some(device("dev", true, Some(80)));
    h.api.set_playback(Some(louder));

    sleep(Duration::from_millis(4_900)).await;
    h.settle().await;
    assert_eq!(h.app.state.data.playback.sample_volume(), Some(80));
    assert_ne!(h.app.state.data.transport.volume, Some(80));

    sleep(Duration::from_millis(200)).await;
    h.settle().await;
    assert_eq!(h.app.state.data.transport.volume, Some(80));
}
