use crate::events::AppEvent;
use async_channel::Sender;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use piechart::config::get_config_path;
use std::path::Path;

/// Whether a filesystem event touched the config file itself.
fn is_config_change(event: &Event, config_path: &Path) -> bool {
    let meaningful_event = matches!(
        event.kind,
        EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
    );
    meaningful_event && event.paths.iter().any(|p| p == config_path)
}

/// Watches the config directory and sends [`AppEvent::ConfigReload`] whenever the config file
/// changes. Runs until the receiving side goes away.
pub async fn run_async_watcher(tx: Sender<AppEvent>) {
    let config_path = match get_config_path() {
        Ok(p) => p,
        Err(e) => {
            log::error!("Config watcher error: {}", e);
            return;
        }
    };
    let config_dir = match config_path.parent() {
        Some(p) => p.to_path_buf(),
        None => return,
    };

    if let Err(e) = fs_err::create_dir_all(&config_dir) {
        log::error!("Failed to create config directory for watching: {}", e);
        return;
    }

    let (bridge_tx, bridge_rx) = async_channel::unbounded();

    let mut watcher = match RecommendedWatcher::new(
        move |res| {
            let _ = bridge_tx.send_blocking(res);
        },
        notify::Config::default(),
    ) {
        Ok(w) => w,
        Err(e) => {
            log::error!("Failed to create watcher: {}", e);
            return;
        }
    };

    if let Err(e) = watcher.watch(&config_dir, RecursiveMode::NonRecursive) {
        log::error!("Failed to watch config directory: {}", e);
        return;
    }
    log::debug!("Watching {}", config_dir.display());

    while let Ok(res) = bridge_rx.recv().await {
        match res {
            Ok(event) => {
                if is_config_change(&event, &config_path)
                    && tx.send(AppEvent::ConfigReload).await.is_err()
                {
                    break;
                }
            }
            Err(e) => log::error!("Watch error: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{AccessKind, CreateKind, ModifyKind};
    use std::path::PathBuf;

    fn event(kind: EventKind, path: &str) -> Event {
        Event::new(kind).add_path(PathBuf::from(path))
    }

    #[test]
    fn test_only_config_file_changes_count() {
        let config = Path::new("/home/u/.config/lifewheel/config.toml");

        let cases = vec![
            (
                event(EventKind::Modify(ModifyKind::Any), "/home/u/.config/lifewheel/config.toml"),
                true,
            ),
            (
                event(EventKind::Create(CreateKind::File), "/home/u/.config/lifewheel/config.toml"),
                true,
            ),
            (
                event(EventKind::Modify(ModifyKind::Any), "/home/u/.config/lifewheel/other.toml"),
                false,
            ),
            (
                event(EventKind::Access(AccessKind::Any), "/home/u/.config/lifewheel/config.toml"),
                false,
            ),
        ];

        for (ev, expected) in cases {
            assert_eq!(is_config_change(&ev, config), expected, "{:?}", ev.kind);
        }
    }
}
