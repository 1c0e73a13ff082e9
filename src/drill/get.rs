// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Html;
use maud::Markup;
use maud::html;

use crate::drill::state::MutableState;
use crate::drill::state::ServerState;
use crate::drill::template::page_template;
use crate::session::Phase;
use crate::session::Session;

pub async fn get_handler(State(state): State<ServerState>) -> (StatusCode, Html<String>) {
    let mutable = state.mutable.lock().unwrap();
    let body = match mutable.session.phase() {
        Phase::Input => input_screen(&mutable),
        Phase::Studying => study_screen(&mutable.session),
        Phase::Complete => complete_screen(),
    };
    let html = page_template(body);
    (StatusCode::OK, Html(html.into_string()))
}

fn input_screen(mutable: &MutableState) -> Markup {
    html! {
        div.root {
            div.input {
                h1 { "Flashcards" }
                form action="/" method="post" {
                    textarea
                        name="deck"
                        placeholder=r#"Paste a JSON array here, e.g. [{"front": "Question", "back": "Answer"}]"#
                    {
                        (mutable.draft)
                    }
                    div.buttons {
                        input type="submit" name="action" value="Load Sample";
                        input.start type="submit" name="action" value="Start";
                    }
                }
                @if let Some(error) = &mutable.deck_error {
                    div.error { (error) }
                }
            }
        }
    }
}

fn study_screen(session: &Session) -> Markup {
    let Some(card) = session.current_card() else {
        // Unreachable: a round is never empty while studying.
        return html! {};
    };
    let progress = format!("Card {} of {}", session.index() + 1, session.round_len());
    let flashcard = if session.is_transitioning() {
        // The flip-to-front animation is playing. The front label is
        // suppressed so the old card's front does not flash before the
        // logical advance; script.js posts FlipComplete at animation end.
        html! {
            div.flashcard.transitioning {
                div.flashcard-inner {
                    div.flashcard-front {}
                    div.flashcard-back { (card.back()) }
                }
            }
        }
    } else if session.is_flipped() {
        html! {
            div.flashcard.flipped {
                div.flashcard-inner {
                    div.flashcard-front { (card.front()) }
                    div.flashcard-back { (card.back()) }
                }
            }
        }
    } else {
        // Front-facing and idle: the whole card is the flip control.
        html! {
            form action="/" method="post" {
                button.flashcard type="submit" name="action" value="Flip" {
                    div.flashcard-inner {
                        div.flashcard-front { (card.front()) }
                        div.flashcard-back { (card.back()) }
                    }
                }
            }
        }
    };
    let controls = if session.is_flipped() {
        html! {
            form.marks action="/" method="post" {
                input.incorrect type="submit" name="action" value="Incorrect";
                input.correct type="submit" name="action" value="Correct";
            }
        }
    } else {
        // Mark controls are hidden while front-facing or transitioning.
        html! {}
    };
    html! {
        div.root {
            div.study {
                div.progress { (progress) }
                (flashcard)
                div.controls { (controls) }
                form.footer action="/" method="post" {
                    input type="submit" name="action" value="New Deck";
                }
            }
        }
    }
}

fn complete_screen() -> Markup {
    html! {
        div.root {
            div.finished {
                h1 { "All Done!" }
                p { "You've mastered all the cards." }
                form action="/" method="post" {
                    input type="submit" name="action" value="Reset";
                    input type="submit" name="action" value="New Deck";
                }
            }
        }
    }
}
