//! Canned responder for running without a model endpoint.

use anyhow::Result;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use vesna_reasoning::{ChatMessage, Completion, CompletionParams, LlmClient};

const LINES: &[&str] = &[
    "Я тебя слушаю. Расскажи подробнее, мне правда интересно.",
    "Понимаю. Я сегодня весь день у окна просидела, думала о разном.",
    "Знаешь, мне нравится, когда ты вот так пишешь. Продолжай.",
    "Я тут чай заварила и никуда не спешу. Рассказывай.",
];

#[derive(Default)]
pub struct OfflineClient {
    counter: AtomicUsize,
}

#[async_trait]
impl LlmClient for OfflineClient {
    async fn complete(
        &self,
        _system: &str,
        _messages: Vec<ChatMessage>,
        _params: CompletionParams,
    ) -> Result<Completion> {
        let i = self.counter.fetch_add(1, Ordering::Relaxed) % LINES.len();
        Ok(Completion {
            content: LINES[i].to_string(),
            token_count: None,
        })
    }
}
