//! Warnings and errors logged by the last failed submission

use leptos::prelude::*;

#[component]
pub fn SubmitDiagnostics(lines: ReadSignal<Vec<String>>) -> impl IntoView {
    move || {
        let lines = lines.get();
        (!lines.is_empty()).then(|| {
            let count = lines.len();
            view! {
                <details class="submit-diagnostics">
                    <summary>{format!("{} problem(s) during the last save", count)}</summary>
                    <ul>
                        {lines.into_iter().map(|line| view! { <li><code>{line}</code></li> }).collect_view()}
                    </ul>
                </details>
            }
        })
    }
}
