//! 通知トースト（一定時間で自動的に消える）

use codesage_common::{Notice, NoticeLevel};
use gloo::timers::callback::Timeout;
use leptos::prelude::*;

const TOAST_DURATION_MS: u32 = 3000;

#[derive(Clone, Debug, PartialEq)]
pub struct Toast {
    pub id: u64,
    pub notice: Notice,
}

/// トーストを追加し、時間経過で取り除く
pub fn push_toast(toasts: RwSignal<Vec<Toast>>, next_id: StoredValue<u64>, notice: Notice) {
    let id = next_id.get_value();
    next_id.set_value(id + 1);

    toasts.update(|t| t.push(Toast { id, notice }));

    Timeout::new(TOAST_DURATION_MS, move || {
        toasts.update(|t| t.retain(|toast| toast.id != id));
    })
    .forget();
}

fn level_class(level: NoticeLevel) -> &'static str {
    match level {
        NoticeLevel::Success => "toast toast-success",
        NoticeLevel::Info => "toast toast-info",
        NoticeLevel::Error => "toast toast-error",
    }
}

#[component]
pub fn Toasts(toasts: RwSignal<Vec<Toast>>) -> impl IntoView {
    view! {
        <div class="toasts">
            <For
                each=move || toasts.get()
                key=|toast| toast.id
                children=move |toast| {
                    view! { <div class=level_class(toast.notice.level)>{toast.notice.message}</div> }
                }
            />
        </div>
    }
}
