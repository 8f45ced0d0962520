//! The `traffic_stops` relation
//!
//! Column names are part of the external contract: reports, search presets
//! and CSV seeding all refer to them by name.

/// Columns of `traffic_stops`, in storage order
pub const COLUMNS: [&str; 16] = [
    "stop_date",
    "stop_time",
    "country_name",
    "driver_gender",
    "driver_age_raw",
    "driver_age",
    "driver_race",
    "violation_raw",
    "violation",
    "search_conducted",
    "search_type",
    "stop_outcome",
    "is_arrested",
    "stop_duration",
    "drugs_related_stop",
    "vehicle_number",
];

pub(crate) const CREATE_TABLE: &str = "
    CREATE TABLE IF NOT EXISTS traffic_stops (
        stop_date DATE NOT NULL,
        stop_time TIME NOT NULL,
        country_name TEXT,
        driver_gender TEXT,
        driver_age_raw INTEGER,
        driver_age INTEGER,
        driver_race TEXT,
        violation_raw TEXT,
        violation TEXT,
        search_conducted INTEGER NOT NULL DEFAULT 0 CHECK (search_conducted IN (0, 1)),
        search_type TEXT,
        stop_outcome TEXT,
        is_arrested INTEGER NOT NULL DEFAULT 0 CHECK (is_arrested IN (0, 1)),
        stop_duration TEXT,
        drugs_related_stop INTEGER NOT NULL DEFAULT 0 CHECK (drugs_related_stop IN (0, 1)),
        vehicle_number TEXT
    );
    CREATE INDEX IF NOT EXISTS idx_traffic_stops_vehicle ON traffic_stops(vehicle_number);
    CREATE INDEX IF NOT EXISTS idx_traffic_stops_country ON traffic_stops(country_name);
";

pub(crate) const INSERT_STOP: &str = "
    INSERT INTO traffic_stops (
        stop_date, stop_time, country_name, driver_gender, driver_age_raw,
        driver_age, driver_race, violation_raw, violation, search_conducted,
        search_type, stop_outcome, is_arrested, stop_duration, drugs_related_stop,
        vehicle_number
    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)
";

pub(crate) const SELECT_ALL: &str = "SELECT * FROM traffic_stops";
