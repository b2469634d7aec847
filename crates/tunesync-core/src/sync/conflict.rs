use serde::Serialize;
use tunesync_types::{AppSnapshot, ConflictStrategy};

/// Which side a conflict resolution picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Winner {
    Local,
    Remote,
}

/// Decide which whole snapshot wins.
///
/// `None` (and any strategy string this build does not know) means
/// last-writer-wins with ties going to the remote side.
pub fn pick_winner(
    local: &AppSnapshot,
    remote: &AppSnapshot,
    strategy: Option<ConflictStrategy>,
) -> Winner {
    match strategy {
        Some(ConflictStrategy::ClientWins) => Winner::Local,
        Some(ConflictStrategy::ServerWins) => Winner::Remote,
        Some(ConflictStrategy::LastWriteWins) | None => {
            if remote.updated_at >= local.updated_at {
                Winner::Remote
            } else {
                Winner::Local
            }
        },
    }
}

/// Return the winning snapshot. Pure and total.
pub fn resolve_conflict(
    local: AppSnapshot,
    remote: AppSnapshot,
    strategy: Option<ConflictStrategy>,
) -> AppSnapshot {
    match pick_winner(&local, &remote, strategy) {
        Winner::Local => local,
        Winner::Remote => remote,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(updated_at: i64, song: &str) -> AppSnapshot {
        let mut s = AppSnapshot::with_timestamp(updated_at);
        s.favorites.songs.push(song.to_string());
        s
    }

    #[test]
    fn test_lww_newer_remote_wins() {
        let winner = resolve_conflict(snap(100, "local"), snap(200, "remote"), None);
        assert_eq!(winner.favorites.songs, vec!["remote"]);
    }

    #[test]
    fn test_lww_newer_local_wins() {
        let winner = resolve_conflict(snap(300, "local"), snap(200, "remote"), None);
        assert_eq!(winner.favorites.songs, vec!["local"]);
    }

    #[test]
    fn test_lww_tie_goes_to_remote() {
        assert_eq!(pick_winner(&snap(5, "l"), &snap(5, "r"), None), Winner::Remote);
        assert_eq!(
            pick_winner(&snap(5, "l"), &snap(5, "r"), Some(ConflictStrategy::LastWriteWins)),
            Winner::Remote
        );
    }

    #[test]
    fn test_client_wins_ignores_timestamps() {
        let winner = resolve_conflict(
            snap(100, "local"),
            snap(200, "remote"),
            Some(ConflictStrategy::ClientWins),
        );
        assert_eq!(winner.favorites.songs, vec!["local"]);
    }

    #[test]
    fn test_server_wins_ignores_timestamps() {
        let winner = resolve_conflict(
            snap(900, "local"),
            snap(200, "remote"),
            Some(ConflictStrategy::ServerWins),
        );
        assert_eq!(winner.favorites.songs, vec!["remote"]);
    }
}
