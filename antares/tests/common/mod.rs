#![allow(dead_code)]

use antares::{Polled, RawMessage, Record, Source, encode, errors::AlertError};
use bson::Document;
use std::{
    collections::VecDeque,
    sync::{
        Arc,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
    time::Duration,
};

/// 按预设批次返回消息的消息源，批次耗尽后置位退出标志
pub struct ScriptedSource {
    batches: VecDeque<Result<Vec<Polled>, AlertError>>,
    exit: Arc<AtomicBool>,
    pub polls: Arc<AtomicUsize>,
    pub closes: Arc<AtomicUsize>,
}

impl ScriptedSource {
    pub fn new(exit: Arc<AtomicBool>) -> Self {
        Self {
            batches: VecDeque::new(),
            exit,
            polls: Arc::new(AtomicUsize::new(0)),
            closes: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn batch(mut self, batch: Vec<Polled>) -> Self {
        self.batches.push_back(Ok(batch));
        self
    }

    pub fn fail(mut self, e: AlertError) -> Self {
        self.batches.push_back(Err(e));
        self
    }
}

impl Source for ScriptedSource {
    fn poll(&mut self, max: usize, _timeout: Duration) -> Result<Vec<Polled>, AlertError> {
        self.polls.fetch_add(1, Ordering::SeqCst);
        match self.batches.pop_front() {
            Some(Ok(batch)) => {
                assert!(batch.len() <= max);
                Ok(batch)
            }
            Some(Err(e)) => Err(e),
            None => {
                self.exit.store(true, Ordering::SeqCst);
                Ok(Vec::new())
            }
        }
    }

    fn close(&mut self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
    }
}

pub fn message(topic: &str, offset: i64, payload: Vec<u8>) -> Polled {
    Polled::Message(RawMessage {
        topic: topic.to_string(),
        partition: 0,
        offset,
        payload,
    })
}

pub fn alert(doc: Document) -> Vec<u8> {
    encode(&Record::new(doc)).unwrap()
}
