use geopicker::{
    geolocation::StaticPosition, Address, GeolocationAdapter, LatLng, LocationPicker,
    PickerConfig,
};
use std::sync::{Arc, Mutex};

/// Path of an optional JSON picker configuration
const CONFIG_ENV: &str = "GEOPICKER_CONFIG";
/// `"lat,lng"` reported as the device position; geolocation is unsupported without it
const POSITION_ENV: &str = "GEOPICKER_DEVICE_POSITION";

/// Last location reported by the picker
#[derive(Debug, Clone)]
struct Selected {
    lat: f64,
    lng: f64,
    address: Option<Address>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    geopicker::init_logging();

    let config = load_config()?;
    let geolocation = device_position()
        .map(|position| {
            GeolocationAdapter::new(Arc::new(StaticPosition(position)), config.geolocation.clone())
        })
        .unwrap_or_default();

    let selected: Arc<Mutex<Option<Selected>>> = Arc::new(Mutex::new(None));
    let sink = selected.clone();
    let picker = LocationPicker::new(config, geolocation)?.on_location_select(
        move |lat, lng, address| {
            log::info!("Selected {:.6}, {:.6}: {:?}", lat, lng, address);
            if let Ok(mut slot) = sink.lock() {
                *slot = Some(Selected {
                    lat,
                    lng,
                    address: address.cloned(),
                });
            }
        },
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1000.0, 720.0])
            .with_title("Geopicker - choose a location"),
        ..Default::default()
    };

    eframe::run_native(
        "geopicker-app",
        options,
        Box::new(move |_cc| Box::new(PickerApp { picker, selected })),
    )?;

    Ok(())
}

fn load_config() -> Result<PickerConfig, Box<dyn std::error::Error>> {
    match std::env::var(CONFIG_ENV) {
        Ok(path) => {
            let json = std::fs::read_to_string(&path)?;
            let config = PickerConfig::from_json_str(&json)?;
            log::info!("Loaded picker config from {}", path);
            Ok(config)
        }
        Err(_) => Ok(PickerConfig::default()),
    }
}

fn device_position() -> Option<LatLng> {
    let raw = std::env::var(POSITION_ENV).ok()?;
    let (lat, lng) = raw.split_once(',')?;
    match LatLng::try_new(lat.trim().parse().ok()?, lng.trim().parse().ok()?) {
        Ok(position) => Some(position),
        Err(e) => {
            log::warn!("Ignoring {}: {}", POSITION_ENV, e);
            None
        }
    }
}

struct PickerApp {
    picker: LocationPicker,
    selected: Arc<Mutex<Option<Selected>>>,
}

impl eframe::App for PickerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::SidePanel::right("selection_panel")
            .default_width(260.0)
            .show(ctx, |ui| {
                ui.heading("Reported location");
                ui.separator();
                let selected = self.selected.lock().ok().and_then(|slot| slot.clone());
                match selected {
                    Some(selected) => {
                        ui.label(format!("Latitude: {:.6}", selected.lat));
                        ui.label(format!("Longitude: {:.6}", selected.lng));
                        match selected.address {
                            Some(address) => {
                                ui.label(format!("City: {}", address.city));
                                ui.label(format!("State: {}", address.state));
                                ui.label(format!("Country: {}", address.country));
                            }
                            None => {
                                ui.label("No address for this point");
                            }
                        }
                    }
                    None => {
                        ui.label("Nothing selected yet");
                    }
                }
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add(&mut self.picker);
        });
    }
}
