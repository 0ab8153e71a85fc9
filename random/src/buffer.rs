use crate::config::EntropyConfig;
use crate::error::{RandomError, RandomResult};
use crate::extract::extract_words;
use crate::queue::BoundedQueue;
use crate::source::{ByteSource, OsByteSource};
use crate::word::{reduce, WordSource};
use std::sync::{Arc, OnceLock};
use std::thread;
use std::time::Duration;

const WORKER_NAME: &str = "q-entropy-refill";

static GLOBAL: OnceLock<EntropyBuffer> = OnceLock::new();

/// Pre-computed random words refilled in the background from a secure source.
///
/// A dedicated worker thread reads `block_size` bytes at a time, turns each
/// block into words with the configured [`Extraction`](crate::Extraction)
/// and pushes them into a bounded queue, waiting whenever the queue is full.
/// Consumers dequeue one word per draw and wait only when the queue is
/// momentarily empty.
///
/// A failing byte source is unrecoverable: the worker logs the failure and
/// aborts the process.
///
/// Dropping an explicitly started buffer stops its worker. The process-wide
/// instance returned by [`EntropyBuffer::global`] lives until exit.
pub struct EntropyBuffer {
    queue: Arc<BoundedQueue<u32>>,
    config: EntropyConfig,
}

impl EntropyBuffer {
    /// Start a buffer fed by the operating system's secure byte source.
    pub fn start(config: EntropyConfig) -> RandomResult<Self> {
        Self::start_with_source(config, OsByteSource)
    }

    /// Start a buffer fed by a caller-supplied byte source.
    pub fn start_with_source<S>(config: EntropyConfig, source: S) -> RandomResult<Self>
    where
        S: ByteSource + Send + 'static,
    {
        config.validate()?;
        let queue = Arc::new(BoundedQueue::new(config.capacity));

        let worker_queue = Arc::clone(&queue);
        let worker_config = config.clone();
        thread::Builder::new()
            .name(WORKER_NAME.into())
            .spawn(move || refill(&worker_queue, &worker_config, source))?;

        tracing::debug!(
            capacity = config.capacity,
            block_size = config.block_size,
            extraction = %config.extraction,
            "started entropy buffer"
        );
        Ok(Self { queue, config })
    }

    /// The process-wide buffer, started with the default configuration on
    /// first use. Initialization happens exactly once.
    pub fn global() -> &'static EntropyBuffer {
        GLOBAL.get_or_init(|| match Self::start(EntropyConfig::default()) {
            Ok(buffer) => buffer,
            Err(err) => {
                tracing::error!(error = %err, "failed to start global entropy buffer");
                std::process::abort();
            }
        })
    }

    pub fn config(&self) -> &EntropyConfig {
        &self.config
    }

    /// Words currently buffered and ready to be drawn.
    pub fn buffered(&self) -> usize {
        self.queue.len()
    }

    /// Like [`next_bounded`](WordSource::next_bounded) but gives up with
    /// [`RandomError::WouldBlock`] if no word arrives within `timeout`.
    pub fn next_bounded_timeout(&self, max: i64, timeout: Duration) -> RandomResult<i64> {
        if max == 0 {
            return Err(RandomError::ZeroBound);
        }
        self.queue
            .pop_timeout(timeout)
            .map(|word| reduce(word, max))
            .ok_or(RandomError::WouldBlock(timeout))
    }
}

impl WordSource for EntropyBuffer {
    fn next_word(&self) -> u32 {
        self.queue.pop()
    }
}

impl Drop for EntropyBuffer {
    fn drop(&mut self) {
        self.queue.close();
    }
}

impl std::fmt::Debug for EntropyBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntropyBuffer")
            .field("config", &self.config)
            .field("buffered", &self.buffered())
            .finish()
    }
}

fn refill<S: ByteSource>(queue: &BoundedQueue<u32>, config: &EntropyConfig, mut source: S) {
    let mut block = vec![0u8; config.block_size];
    loop {
        if let Err(err) = source.fill(&mut block) {
            tracing::error!(error = %err, "secure byte source failed, aborting");
            std::process::abort();
        }
        let words = extract_words(&block, config.extraction);
        tracing::trace!(words = words.len(), "refilled entropy block");
        if !queue.push_all(words) {
            tracing::debug!("entropy buffer dropped, refill worker exiting");
            return;
        }
    }
}

/// Draw from the global buffer: a value in `[0, max)` for positive `max`.
pub fn intn(max: i64) -> RandomResult<i64> {
    EntropyBuffer::global().next_bounded(max)
}
