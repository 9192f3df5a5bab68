use leptos::prelude::*;
use shutter_shared::{LikeCount, LikeStatus};
use wasm_bindgen_futures::spawn_local;

use crate::api::{self, Gateway, Navigator, Transport};
use crate::error::ApiError;
use crate::like_state::LikeTracker;
use crate::session::SessionStore;

/// Somewhere a [`LikeTracker`] lives between await points.
pub trait LikeSlot {
    /// `None` once the owning view is gone.
    fn with_tracker<R>(&self, f: impl FnOnce(&mut LikeTracker) -> R) -> Option<R>;
}

impl LikeSlot for RwSignal<LikeTracker> {
    fn with_tracker<R>(&self, f: impl FnOnce(&mut LikeTracker) -> R) -> Option<R> {
        self.try_update(f)
    }
}

pub async fn load_like_count<T, S, N, L>(gw: &Gateway<T, S, N>, post_id: i64, slot: &L)
where
    T: Transport,
    S: SessionStore,
    N: Navigator,
    L: LikeSlot,
{
    if let Ok(resp) = gw
        .get_json::<LikeCount>(&format!("/likes/{}/count", post_id))
        .await
    {
        slot.with_tracker(|t| t.load_count(resp.count));
    }
}

/// Flip the like locally, then settle it against the server.
pub async fn toggle_like<T, S, N, L>(gw: &Gateway<T, S, N>, post_id: i64, slot: &L)
where
    T: Transport,
    S: SessionStore,
    N: Navigator,
    L: LikeSlot,
{
    if slot.with_tracker(LikeTracker::begin_toggle).flatten().is_none() {
        return;
    }

    match gw
        .post_empty::<LikeStatus>(&format!("/likes/{}", post_id))
        .await
    {
        Ok(status) => {
            tracing::debug!(post_id, liked = status.liked, count = status.count, "like reconciled");
            slot.with_tracker(|t| t.reconcile(status));
        }
        Err(err @ ApiError::Rejected { .. }) => {
            tracing::warn!(post_id, error = %err, "like refused, rolling back");
            slot.with_tracker(LikeTracker::roll_back);
        }
        Err(err) => {
            // No usable answer: leave the optimistic state on screen.
            tracing::warn!(post_id, error = %err, "like left unreconciled");
            slot.with_tracker(LikeTracker::abandon);
        }
    }
}

#[component]
pub fn LikeButton(post_id: i64) -> impl IntoView {
    let tracker = RwSignal::new(LikeTracker::default());

    spawn_local(async move {
        load_like_count(&api::gateway(), post_id, &tracker).await;
    });

    let on_click = move |_| {
        spawn_local(async move {
            toggle_like(&api::gateway(), post_id, &tracker).await;
        });
    };

    view! {
        <button
            class="like-btn"
            class:liked=move || tracker.get().display().state.is_liked()
            disabled=move || tracker.get().is_pending()
            on:click=on_click
        >
            "Like "
            <span class="like-count">{move || tracker.get().display().count}</span>
        </button>
    }
}
