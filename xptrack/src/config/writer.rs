//! INI serialization logic for converting `ConfigFile` → INI string.
//!
//! Produces the commented INI representation written to `config.ini`.

use super::keys::path_to_display;
use super::settings::ConfigFile;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    let output_directory = config
        .output
        .directory
        .as_deref()
        .map(path_to_display)
        .unwrap_or_default();

    format!(
        r#"[telemetry]
; UDP port X-Plane sends data output to (default: 49005)
; In X-Plane: Settings > Data Output > Send network data output,
; and enable rows 3, 4, 16, 17 and 20.
port = {}
; Capacity of the queue between the UDP receiver and the recorder (default: 256)
channel_capacity = {}

[track]
; Flight-data points closer than this to the last kept point are dropped (default: 5)
; Latitude, longitude and altitude share one space, so this is a mixed unit.
simplify_tolerance = {}
; Fixed altitude used to draw ground segments (default: 1)
ground_altitude = {}
; Vertical rate shown on flight-data points:
;   angular - Y component of the angular velocity vector (default)
;   vvi     - vertical speed in ft/min
vertical_rate_source = {}
; Altitude of flight-data points:
;   msl - above mean sea level (default)
;   agl - above ground level
data_altitude = {}

[logging]
; Log file path, cleared on each start
file = {}

[output]
; Directory saved flight logs are written to
; If empty, the current working directory is used
directory = {}
"#,
        config.telemetry.port,
        config.telemetry.channel_capacity,
        config.track.simplify_tolerance,
        config.track.ground_altitude,
        config.track.vertical_rate_source,
        config.track.data_altitude,
        path_to_display(&config.logging.file),
        output_directory,
    )
}
