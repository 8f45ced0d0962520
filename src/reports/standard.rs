//! Standard tier: single-table grouping, counting and rate reports

use super::ReportDefinition;

pub(super) const REPORTS: &[ReportDefinition] = &[
    ReportDefinition {
        name: "Top 10 Vehicles in Drug-Related Stops",
        description: "Vehicles appearing most often in drug-related stops",
        sql: "
            SELECT vehicle_number, COUNT(*) AS stop_count
            FROM traffic_stops
            WHERE drugs_related_stop = 1 AND vehicle_number IS NOT NULL
            GROUP BY vehicle_number
            ORDER BY stop_count DESC, vehicle_number
            LIMIT 10
        ",
    },
    ReportDefinition {
        name: "Most Frequently Searched Vehicles",
        description: "Vehicles searched most often",
        sql: "
            SELECT vehicle_number, COUNT(*) AS search_count
            FROM traffic_stops
            WHERE search_conducted = 1 AND vehicle_number IS NOT NULL
            GROUP BY vehicle_number
            ORDER BY search_count DESC, vehicle_number
            LIMIT 15
        ",
    },
    ReportDefinition {
        name: "Age Group with Highest Arrest Rate",
        description: "Arrest rate per driver age group",
        sql: "
            SELECT
                age_group,
                COUNT(*) AS total_stops,
                SUM(is_arrested) AS arrests,
                ROUND(CAST(SUM(is_arrested) AS REAL) / COUNT(*) * 100, 2) AS arrest_rate
            FROM (
                SELECT
                    CASE
                        WHEN driver_age < 25 THEN '<25'
                        WHEN driver_age < 35 THEN '25-34'
                        WHEN driver_age < 45 THEN '35-44'
                        WHEN driver_age < 55 THEN '45-54'
                        ELSE '55+'
                    END AS age_group,
                    is_arrested
                FROM traffic_stops
                WHERE driver_age IS NOT NULL
            )
            GROUP BY age_group
            ORDER BY arrest_rate DESC, age_group
        ",
    },
    ReportDefinition {
        name: "Gender Distribution by Country",
        description: "Stops per driver gender within each country",
        sql: "
            SELECT country_name, driver_gender, COUNT(*) AS stop_count
            FROM traffic_stops
            WHERE country_name IS NOT NULL AND driver_gender IS NOT NULL
            GROUP BY country_name, driver_gender
            ORDER BY country_name, stop_count DESC, driver_gender
        ",
    },
    ReportDefinition {
        name: "Race & Gender Combination - Highest Search Rate",
        description: "Race and gender pairs with at least 5 stops, by search rate",
        sql: "
            SELECT
                driver_race,
                driver_gender,
                COUNT(*) AS total_stops,
                SUM(search_conducted) AS searches,
                ROUND(CAST(SUM(search_conducted) AS REAL) / COUNT(*) * 100, 2) AS search_rate
            FROM traffic_stops
            WHERE driver_race IS NOT NULL AND driver_gender IS NOT NULL
            GROUP BY driver_race, driver_gender
            HAVING COUNT(*) >= 5
            ORDER BY search_rate DESC, driver_race, driver_gender
            LIMIT 10
        ",
    },
    ReportDefinition {
        name: "Most Traffic Stops by Time of Day",
        description: "Stops per four-way time-of-day period",
        sql: "
            SELECT time_period, COUNT(*) AS stops
            FROM (
                SELECT
                    CASE
                        WHEN hour >= 6 AND hour < 12 THEN 'Morning (6AM-12PM)'
                        WHEN hour >= 12 AND hour < 18 THEN 'Afternoon (12PM-6PM)'
                        WHEN hour >= 18 AND hour < 24 THEN 'Evening (6PM-12AM)'
                        ELSE 'Night (12AM-6AM)'
                    END AS time_period
                FROM (
                    SELECT CAST(strftime('%H', stop_time) AS INTEGER) AS hour
                    FROM traffic_stops
                    WHERE stop_time IS NOT NULL
                )
            )
            GROUP BY time_period
            ORDER BY stops DESC, time_period
        ",
    },
    ReportDefinition {
        name: "Average Stop Duration by Violation",
        description: "Mean stop duration in minutes per violation",
        sql: "
            SELECT
                violation,
                COUNT(*) AS stop_count,
                ROUND(AVG(CAST(
                    CASE
                        WHEN instr(trim(stop_duration), ' ') > 0
                            THEN substr(trim(stop_duration), 1, instr(trim(stop_duration), ' ') - 1)
                        ELSE trim(stop_duration)
                    END AS REAL)), 2) AS avg_duration_mins
            FROM traffic_stops
            WHERE violation IS NOT NULL AND stop_duration IS NOT NULL
            GROUP BY violation
            ORDER BY avg_duration_mins DESC, violation
            LIMIT 15
        ",
    },
    ReportDefinition {
        name: "Night Stops vs Arrests",
        description: "Arrest rate at night (8PM-6AM) against daytime",
        sql: "
            SELECT
                period,
                COUNT(*) AS total_stops,
                SUM(is_arrested) AS arrests,
                ROUND(CAST(SUM(is_arrested) AS REAL) / COUNT(*) * 100, 2) AS arrest_rate
            FROM (
                SELECT
                    CASE
                        WHEN CAST(strftime('%H', stop_time) AS INTEGER) >= 20
                            OR CAST(strftime('%H', stop_time) AS INTEGER) < 6
                            THEN 'Night (8PM-6AM)'
                        ELSE 'Day (6AM-8PM)'
                    END AS period,
                    is_arrested
                FROM traffic_stops
                WHERE stop_time IS NOT NULL
            )
            GROUP BY period
            ORDER BY arrest_rate DESC, period
        ",
    },
    ReportDefinition {
        name: "Violations Associated with Searches/Arrests",
        description: "Search and arrest rates per violation",
        sql: "
            SELECT
                violation,
                COUNT(*) AS total_stops,
                SUM(search_conducted) AS search_count,
                SUM(is_arrested) AS arrest_count,
                ROUND(CAST(SUM(search_conducted) AS REAL) / COUNT(*) * 100, 2) AS search_rate,
                ROUND(CAST(SUM(is_arrested) AS REAL) / COUNT(*) * 100, 2) AS arrest_rate
            FROM traffic_stops
            WHERE violation IS NOT NULL
            GROUP BY violation
            ORDER BY search_rate DESC, violation
            LIMIT 15
        ",
    },
    ReportDefinition {
        name: "Most Common Violations Among Younger Drivers (<25)",
        description: "Violation counts for drivers under 25",
        sql: "
            SELECT violation, COUNT(*) AS violation_count
            FROM traffic_stops
            WHERE driver_age < 25 AND violation IS NOT NULL
            GROUP BY violation
            ORDER BY violation_count DESC, violation
            LIMIT 10
        ",
    },
    ReportDefinition {
        name: "Violations Rarely Resulting in Search/Arrest",
        description: "Violations that never led to a search or an arrest",
        sql: "
            SELECT
                violation,
                COUNT(*) AS total_stops,
                SUM(search_conducted) AS searches,
                SUM(is_arrested) AS arrests,
                ROUND(CAST(SUM(search_conducted) AS REAL) / COUNT(*) * 100, 2) AS search_rate,
                ROUND(CAST(SUM(is_arrested) AS REAL) / COUNT(*) * 100, 2) AS arrest_rate
            FROM traffic_stops
            WHERE violation IS NOT NULL
            GROUP BY violation
            HAVING SUM(search_conducted) = 0 AND SUM(is_arrested) = 0
            ORDER BY total_stops DESC, violation
        ",
    },
    ReportDefinition {
        name: "Countries with Highest Drug-Related Stops Rate",
        description: "Share of drug-related stops per country",
        sql: "
            SELECT
                country_name,
                COUNT(*) AS total_stops,
                SUM(drugs_related_stop) AS drug_stops,
                ROUND(CAST(SUM(drugs_related_stop) AS REAL) / COUNT(*) * 100, 2) AS drug_stop_rate
            FROM traffic_stops
            WHERE country_name IS NOT NULL
            GROUP BY country_name
            ORDER BY drug_stop_rate DESC, country_name
        ",
    },
    ReportDefinition {
        name: "Arrest Rate by Country and Violation",
        description: "Arrest rate per country and violation with at least 3 stops",
        sql: "
            SELECT
                country_name,
                violation,
                COUNT(*) AS total_stops,
                SUM(is_arrested) AS arrests,
                ROUND(CAST(SUM(is_arrested) AS REAL) / COUNT(*) * 100, 2) AS arrest_rate
            FROM traffic_stops
            WHERE country_name IS NOT NULL AND violation IS NOT NULL
            GROUP BY country_name, violation
            HAVING COUNT(*) >= 3
            ORDER BY arrest_rate DESC, country_name, violation
            LIMIT 20
        ",
    },
    ReportDefinition {
        name: "Country with Most Stops - Search Conducted",
        description: "Searches conducted per country",
        sql: "
            SELECT
                country_name,
                COUNT(*) AS total_stops,
                SUM(search_conducted) AS searches_conducted,
                ROUND(CAST(SUM(search_conducted) AS REAL) / COUNT(*) * 100, 2) AS search_rate
            FROM traffic_stops
            WHERE country_name IS NOT NULL
            GROUP BY country_name
            ORDER BY searches_conducted DESC, country_name
        ",
    },
];
