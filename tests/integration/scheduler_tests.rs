//! Refresh scheduler integration tests
//!
//! All tests run on a paused clock; sleeping advances virtual time only.

#[cfg(test)]
mod tests {
    use crate::common::loaded_board;
    use coursedesk::config::RefreshConfig;
    use coursedesk::sdk::memory::Endpoint;
    use coursedesk::{DeskError, RefreshScheduler};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::sleep;

    fn manual_only() -> RefreshConfig {
        RefreshConfig {
            auto_refresh: false,
            ..RefreshConfig::default()
        }
    }

    // ==================== Focus and visibility ====================

    #[tokio::test(start_paused = true)]
    async fn test_focus_and_visibility_within_window_refresh_once() {
        let (api, board) = loaded_board().await;
        let handle = RefreshScheduler::spawn(Arc::clone(&board), &manual_only());

        handle.notify_focus();
        sleep(Duration::from_millis(200)).await;
        handle.notify_visibility();
        sleep(Duration::from_millis(600)).await;

        assert_eq!(api.calls(Endpoint::ListBatches), 2);
        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_events_in_separate_windows_refresh_separately() {
        let (api, board) = loaded_board().await;
        let handle = RefreshScheduler::spawn(Arc::clone(&board), &manual_only());

        handle.notify_focus();
        sleep(Duration::from_millis(700)).await;
        handle.notify_visibility();
        sleep(Duration::from_millis(700)).await;

        assert_eq!(api.calls(Endpoint::ListBatches), 3);
        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_focus_waits_for_the_window() {
        let (api, board) = loaded_board().await;
        let handle = RefreshScheduler::spawn(Arc::clone(&board), &manual_only());

        handle.notify_focus();
        sleep(Duration::from_millis(400)).await;
        assert_eq!(api.calls(Endpoint::ListBatches), 1);
        sleep(Duration::from_millis(200)).await;
        assert_eq!(api.calls(Endpoint::ListBatches), 2);
        handle.shutdown().await;
    }

    // ==================== Interval ====================

    #[tokio::test(start_paused = true)]
    async fn test_interval_fires_every_thirty_seconds() {
        let (api, board) = loaded_board().await;
        let handle = RefreshScheduler::spawn(Arc::clone(&board), &RefreshConfig::default());

        sleep(Duration::from_secs(29)).await;
        assert_eq!(api.calls(Endpoint::ListBatches), 1);
        sleep(Duration::from_secs(2)).await;
        assert_eq!(api.calls(Endpoint::ListBatches), 2);
        sleep(Duration::from_secs(30)).await;
        assert_eq!(api.calls(Endpoint::ListBatches), 3);
        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_disabling_auto_refresh_stops_polling() {
        let (api, board) = loaded_board().await;
        let handle = RefreshScheduler::spawn(Arc::clone(&board), &RefreshConfig::default());

        sleep(Duration::from_secs(10)).await;
        handle.set_auto_refresh(false);
        sleep(Duration::from_secs(90)).await;
        assert_eq!(api.calls(Endpoint::ListBatches), 1);

        // Re-enabling restarts the period from now
        handle.set_auto_refresh(true);
        sleep(Duration::from_secs(29)).await;
        assert_eq!(api.calls(Endpoint::ListBatches), 1);
        sleep(Duration::from_secs(2)).await;
        assert_eq!(api.calls(Endpoint::ListBatches), 2);
        handle.shutdown().await;
    }

    // ==================== Failures ====================

    #[tokio::test(start_paused = true)]
    async fn test_background_failure_is_silent_manual_is_not() {
        let (api, board) = loaded_board().await;
        let handle = RefreshScheduler::spawn(Arc::clone(&board), &RefreshConfig::default());
        api.set_failing(Endpoint::ListBatches, true);

        sleep(Duration::from_secs(31)).await;
        assert_eq!(api.calls(Endpoint::ListBatches), 2);
        assert!(board.banner().is_none());
        assert!(handle.is_running());

        let err = handle.refresh_now().await.unwrap_err();
        assert_eq!(err.status_code(), Some(503));
        assert!(board.banner().is_some());
        handle.shutdown().await;
    }

    // ==================== Teardown ====================

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_stops_all_refreshes() {
        let (api, board) = loaded_board().await;
        let handle = RefreshScheduler::spawn(Arc::clone(&board), &RefreshConfig::default());
        assert!(handle.is_running());

        handle.notify_focus();
        handle.shutdown().await;
        sleep(Duration::from_secs(120)).await;

        assert_eq!(api.calls(Endpoint::ListBatches), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_handle_stops_polling() {
        let (api, board) = loaded_board().await;
        let handle = RefreshScheduler::spawn(Arc::clone(&board), &RefreshConfig::default());
        drop(handle);

        sleep(Duration::from_secs(120)).await;
        assert_eq!(api.calls(Endpoint::ListBatches), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unmount_closes_board() {
        let (api, board) = loaded_board().await;
        let handle = RefreshScheduler::spawn(Arc::clone(&board), &RefreshConfig::default());

        handle.unmount().await;
        assert!(board.is_closed());

        sleep(Duration::from_secs(120)).await;
        assert_eq!(api.calls(Endpoint::ListBatches), 1);
        assert!(matches!(
            board.refresh(coursedesk::RefreshTrigger::Manual).await,
            Err(DeskError::Closed)
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_loop_exits_when_board_is_unmounted_elsewhere() {
        let (_api, board) = loaded_board().await;
        let handle = RefreshScheduler::spawn(Arc::clone(&board), &RefreshConfig::default());

        board.unmount();
        sleep(Duration::from_secs(31)).await;

        assert!(!handle.is_running());
        assert!(matches!(handle.refresh_now().await, Err(DeskError::Closed)));
    }
}
