use poster_core::{AppViewModel, LifecycleState};

/// One-line status for the current view.
pub fn status_line(view: &AppViewModel) -> String {
    let place = view.place.trim();
    match view.state {
        LifecycleState::Idle if view.submitting => format!("Submitting {place}..."),
        LifecycleState::Idle => "Ready".to_string(),
        LifecycleState::Generating => {
            let job = view
                .job_id
                .as_ref()
                .map(|id| id.to_string())
                .unwrap_or_default();
            let progress = view.progress_message.unwrap_or_default();
            match view.estimated_seconds {
                Some(seconds) => {
                    format!("Generating {place} (job {job}, about {seconds}s): {progress}")
                }
                None => format!("Generating {place} (job {job}): {progress}"),
            }
        }
        LifecycleState::Completed => match &view.artifact {
            Some(artifact) => format!("Poster of {place} is ready: {artifact}"),
            None => format!("Poster of {place} is ready"),
        },
        LifecycleState::Error => format!(
            "Error: {}",
            view.message.as_deref().unwrap_or("Something went wrong")
        ),
        LifecycleState::RateLimited => view.message.clone().unwrap_or_default(),
    }
}

/// Notification banner, if one is visible.
pub fn notification_line(view: &AppViewModel) -> Option<String> {
    view.notification
        .as_ref()
        .map(|notification| format!("[notice] {}", notification.message))
}
