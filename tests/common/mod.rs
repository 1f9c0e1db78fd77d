//! Shared fixtures for the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use geopicker::prelude::*;
use geopicker::runtime::BoxFuture;

/// Holds spawned futures until the test decides to run them
#[derive(Clone, Default)]
pub struct ManualSpawner {
    queue: Arc<Mutex<Vec<BoxFuture>>>,
}

struct PendingTask;

impl AsyncHandle for PendingTask {
    fn is_finished(&self) -> bool {
        false
    }

    fn cancel(&self) {}
}

impl AsyncSpawner for ManualSpawner {
    fn spawn_boxed(&self, future: BoxFuture) -> Box<dyn AsyncHandle> {
        self.queue.lock().unwrap().push(future);
        Box::new(PendingTask)
    }
}

impl ManualSpawner {
    pub fn pending(&self) -> usize {
        self.queue.lock().unwrap().len()
    }

    /// Removes every queued future, in spawn order
    pub fn take_all(&self) -> Vec<BoxFuture> {
        self.queue.lock().unwrap().drain(..).collect()
    }

    pub fn run_all(&self) {
        for task in self.take_all() {
            futures::executor::block_on(task);
        }
    }
}

/// What the scripted geocoder answers for one coordinate
#[derive(Debug, Clone)]
pub enum Reply {
    Found(Address),
    Nothing,
    Fails(u16),
    Panics,
}

/// Geocoder answering from a table and recording every lookup
#[derive(Clone, Default)]
pub struct ScriptedGeocoder {
    replies: Arc<Mutex<Vec<(LatLng, Reply)>>>,
    calls: Arc<Mutex<Vec<LatLng>>>,
}

impl ScriptedGeocoder {
    pub fn reply(self, coordinate: LatLng, reply: Reply) -> Self {
        self.replies.lock().unwrap().push((coordinate, reply));
        self
    }

    pub fn calls(&self) -> Vec<LatLng> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReverseGeocoder for ScriptedGeocoder {
    async fn resolve(&self, coordinate: LatLng) -> Result<Option<Address>> {
        self.calls.lock().unwrap().push(coordinate);
        let reply = self
            .replies
            .lock()
            .unwrap()
            .iter()
            .find(|(at, _)| *at == coordinate)
            .map(|(_, reply)| reply.clone())
            .unwrap_or(Reply::Nothing);

        match reply {
            Reply::Found(address) => Ok(Some(address)),
            Reply::Nothing => Ok(None),
            Reply::Fails(status) => Err(PickerError::Status { status }),
            Reply::Panics => panic!("geocoder crashed on {}", coordinate.display_fixed(6)),
        }
    }
}

/// Every `(lat, lng, address)` the consumer received
pub type Reports = Arc<Mutex<Vec<(f64, f64, Option<Address>)>>>;

pub struct Harness {
    pub controller: SelectionController,
    pub surface: SharedSurface,
    pub spawner: ManualSpawner,
    pub geocoder: ScriptedGeocoder,
    pub reports: Reports,
}

impl Harness {
    pub fn new(geocoder: ScriptedGeocoder) -> Self {
        Self::with_geolocation(geocoder, GeolocationAdapter::unsupported())
    }

    pub fn with_geolocation(geocoder: ScriptedGeocoder, geolocation: GeolocationAdapter) -> Self {
        Self::with_config(PickerConfig::default(), geocoder, geolocation)
    }

    pub fn with_config(
        config: PickerConfig,
        geocoder: ScriptedGeocoder,
        geolocation: GeolocationAdapter,
    ) -> Self {
        let surface = SharedSurface::default();
        let spawner = ManualSpawner::default();
        let reports: Reports = Arc::new(Mutex::new(Vec::new()));
        let sink = reports.clone();

        let controller = SelectionController::mount(
            config,
            surface.clone(),
            Arc::new(geocoder.clone()),
            geolocation,
        )
        .unwrap()
        .with_spawner(Arc::new(spawner.clone()))
        .on_location_select(move |lat, lng, address| {
            sink.lock().unwrap().push((lat, lng, address.cloned()));
        });

        Self {
            controller,
            surface,
            spawner,
            geocoder,
            reports,
        }
    }

    /// Runs every queued lookup and applies the results
    pub fn settle(&mut self) {
        self.controller.poll();
        while self.spawner.pending() > 0 {
            self.spawner.run_all();
            self.controller.poll();
        }
    }

    pub fn reports(&self) -> Vec<(f64, f64, Option<Address>)> {
        self.reports.lock().unwrap().clone()
    }
}

pub fn new_york() -> Address {
    Address::new("New York", "New York", "United States")
}
