//! Background sample loading
//!
//! [`SampleLoader::spawn`] fetches and decodes every file in a manifest on a
//! worker thread and hands the finished [`SampleBank`] back over a channel.
//! The UI polls [`PendingLoad::try_take`] once per frame. Any single failed
//! file fails the whole load.

use crate::error::LoadError;
use crate::fetch::AssetFetcher;
use crate::manifest::SampleManifest;
use crate::pitch::parse_note_id;
use crate::sample_loader::{decode_sample, SampleData};
use crossbeam_channel::{Receiver, TryRecvError};
use std::thread;
use std::time::Instant;

/// A decoded sample and the pitch it was recorded at
#[derive(Debug, Clone)]
pub struct SampleZone {
    pub note_id: String,
    pub root_key: u8,
    pub data: SampleData,
}

/// Every decoded zone of a manifest, sorted by root key
#[derive(Debug, Clone, Default)]
pub struct SampleBank {
    pub zones: Vec<SampleZone>,
}

impl SampleBank {
    pub fn new(mut zones: Vec<SampleZone>) -> Self {
        zones.sort_by_key(|z| z.root_key);
        Self { zones }
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }
}

pub struct SampleLoader;

impl SampleLoader {
    /// Start loading `manifest` on a background thread
    pub fn spawn<F>(manifest: SampleManifest, fetcher: F) -> Result<PendingLoad, LoadError>
    where
        F: AssetFetcher + 'static,
    {
        let (tx, rx) = crossbeam_channel::bounded(1);

        thread::Builder::new()
            .name("keybed-sample-loader".into())
            .spawn(move || {
                let result = load_bank(&manifest, &fetcher);
                if let Err(e) = &result {
                    log::error!("Sample loading failed: {}", e);
                }
                // The receiver may already be gone if the surface unmounted
                let _ = tx.send(result);
            })
            .map_err(LoadError::Spawn)?;

        Ok(PendingLoad { rx })
    }
}

/// Handle to an in-flight load
pub struct PendingLoad {
    rx: Receiver<Result<SampleBank, LoadError>>,
}

impl PendingLoad {
    /// Non-blocking poll; `Some` exactly once when the load finishes
    pub fn try_take(&mut self) -> Option<Result<SampleBank, LoadError>> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(LoadError::LoaderGone)),
        }
    }

    /// Block until the load finishes
    pub fn wait(self) -> Result<SampleBank, LoadError> {
        self.rx.recv().map_err(|_| LoadError::LoaderGone)?
    }
}

/// Fetch and decode every file, one scoped thread per file
pub fn load_bank<F>(manifest: &SampleManifest, fetcher: &F) -> Result<SampleBank, LoadError>
where
    F: AssetFetcher + ?Sized,
{
    if manifest.is_empty() {
        return Err(LoadError::EmptyManifest);
    }

    let start = Instant::now();
    log::info!(
        "Loading {} samples from {}",
        manifest.len(),
        manifest.base_url
    );

    let results: Vec<Result<SampleZone, LoadError>> = thread::scope(|scope| {
        let handles: Vec<_> = manifest
            .files
            .iter()
            .map(|(note_id, file)| scope.spawn(move || load_zone(manifest, fetcher, note_id, file)))
            .collect();

        handles
            .into_iter()
            .map(|handle| handle.join().unwrap_or(Err(LoadError::LoaderGone)))
            .collect()
    });

    let zones = results.into_iter().collect::<Result<Vec<_>, _>>()?;

    log::info!(
        "Loaded {} samples in {:.2}s",
        zones.len(),
        start.elapsed().as_secs_f32()
    );

    Ok(SampleBank::new(zones))
}

fn load_zone<F>(
    manifest: &SampleManifest,
    fetcher: &F,
    note_id: &str,
    file: &str,
) -> Result<SampleZone, LoadError>
where
    F: AssetFetcher + ?Sized,
{
    let root_key = parse_note_id(note_id).ok_or_else(|| LoadError::InvalidNote(note_id.to_string()))?;

    let url = manifest.url_for(file);
    log::debug!("Fetching {}", url);
    let bytes = fetcher.fetch(&url)?;
    let data = decode_sample(file, bytes)?;
    log::debug!(
        "Decoded {} ({:.2}s at {} Hz)",
        file,
        data.duration(),
        data.sample_rate
    );

    Ok(SampleZone {
        note_id: note_id.to_string(),
        root_key,
        data,
    })
}
