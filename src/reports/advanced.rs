//! Advanced tier: window functions, rankings and partition shares

use super::ReportDefinition;

pub(super) const REPORTS: &[ReportDefinition] = &[
    ReportDefinition {
        name: "Yearly Breakdown of Stops and Arrests by Country",
        description: "Stops and arrests per country and year, ranked within each year",
        sql: "
            WITH yearly AS (
                SELECT
                    CAST(strftime('%Y', stop_date) AS INTEGER) AS year,
                    country_name,
                    COUNT(*) AS total_stops,
                    SUM(is_arrested) AS total_arrests
                FROM traffic_stops
                WHERE country_name IS NOT NULL AND stop_date IS NOT NULL
                GROUP BY CAST(strftime('%Y', stop_date) AS INTEGER), country_name
            )
            SELECT
                year,
                country_name,
                total_stops,
                total_arrests,
                ROUND(CAST(total_arrests AS REAL) / total_stops * 100, 2) AS arrest_rate,
                RANK() OVER (PARTITION BY year ORDER BY total_stops DESC) AS rank_by_stops
            FROM yearly
            ORDER BY year DESC, total_stops DESC, country_name
        ",
    },
    ReportDefinition {
        name: "Driver Violation Trends - Age and Race",
        description: "Violation counts per race and age group, numbered within each race",
        sql: "
            WITH grouped AS (
                SELECT
                    driver_race,
                    CASE
                        WHEN driver_age < 25 THEN '<25'
                        WHEN driver_age < 35 THEN '25-34'
                        WHEN driver_age < 45 THEN '35-44'
                        WHEN driver_age < 55 THEN '45-54'
                        ELSE '55+'
                    END AS age_group,
                    violation,
                    is_arrested
                FROM traffic_stops
                WHERE driver_race IS NOT NULL AND driver_age IS NOT NULL AND violation IS NOT NULL
            ),
            counted AS (
                SELECT
                    driver_race,
                    age_group,
                    violation,
                    COUNT(*) AS violation_count,
                    SUM(is_arrested) AS arrests
                FROM grouped
                GROUP BY driver_race, age_group, violation
            )
            SELECT
                driver_race,
                age_group,
                violation,
                violation_count,
                arrests,
                ROW_NUMBER() OVER (
                    PARTITION BY driver_race
                    ORDER BY violation_count DESC, violation, age_group
                ) AS violation_rank
            FROM counted
            ORDER BY driver_race, violation_count DESC, violation_rank
        ",
    },
    ReportDefinition {
        name: "Time Period Analysis - Stops by Year, Month, Hour",
        description: "Stops, arrests and mean driver age per year, month and hour",
        sql: "
            SELECT
                year,
                month,
                hour_of_day,
                COUNT(*) AS stops,
                SUM(is_arrested) AS arrests,
                ROUND(AVG(driver_age), 1) AS avg_driver_age
            FROM (
                SELECT
                    CAST(strftime('%Y', stop_date) AS INTEGER) AS year,
                    CAST(strftime('%m', stop_date) AS INTEGER) AS month,
                    CAST(strftime('%H', stop_time) AS INTEGER) AS hour_of_day,
                    is_arrested,
                    driver_age
                FROM traffic_stops
                WHERE stop_date IS NOT NULL AND stop_time IS NOT NULL
            )
            GROUP BY year, month, hour_of_day
            ORDER BY year DESC, month DESC, hour_of_day
        ",
    },
    ReportDefinition {
        name: "Violations with High Search and Arrest Rates",
        description: "Violations with at least 5 stops, ranked by search and arrest rate",
        sql: "
            WITH counted AS (
                SELECT
                    violation,
                    COUNT(*) AS total_stops,
                    SUM(search_conducted) AS searches,
                    SUM(is_arrested) AS arrests
                FROM traffic_stops
                WHERE violation IS NOT NULL
                GROUP BY violation
                HAVING COUNT(*) >= 5
            )
            SELECT
                violation,
                total_stops,
                searches,
                arrests,
                ROUND(CAST(searches AS REAL) / total_stops * 100, 2) AS search_rate,
                ROUND(CAST(arrests AS REAL) / total_stops * 100, 2) AS arrest_rate,
                RANK() OVER (ORDER BY CAST(searches AS REAL) / total_stops DESC) AS search_rank,
                RANK() OVER (ORDER BY CAST(arrests AS REAL) / total_stops DESC) AS arrest_rank
            FROM counted
            ORDER BY search_rate DESC, arrest_rate DESC, violation
        ",
    },
    ReportDefinition {
        name: "Driver Demographics by Country",
        description: "Driver counts and ages per race and gender, as a share of each country",
        sql: "
            WITH demographics AS (
                SELECT
                    country_name,
                    driver_race,
                    driver_gender,
                    COUNT(*) AS driver_count,
                    ROUND(AVG(driver_age), 1) AS avg_age,
                    MIN(driver_age) AS min_age,
                    MAX(driver_age) AS max_age,
                    SUM(is_arrested) AS total_arrests
                FROM traffic_stops
                WHERE country_name IS NOT NULL AND driver_race IS NOT NULL AND driver_gender IS NOT NULL
                GROUP BY country_name, driver_race, driver_gender
            )
            SELECT
                country_name,
                driver_race,
                driver_gender,
                driver_count,
                avg_age,
                min_age,
                max_age,
                total_arrests,
                ROUND(100.0 * driver_count / SUM(driver_count) OVER (PARTITION BY country_name), 2)
                    AS pct_by_country
            FROM demographics
            ORDER BY country_name, pct_by_country DESC, driver_race, driver_gender
        ",
    },
    ReportDefinition {
        name: "Top 5 Violations with Highest Arrest Rates",
        description: "Five violations with at least 5 stops and the highest arrest rate",
        sql: "
            WITH rated AS (
                SELECT
                    violation,
                    COUNT(*) AS total_stops,
                    SUM(is_arrested) AS arrests,
                    ROUND(CAST(SUM(is_arrested) AS REAL) / COUNT(*) * 100, 2) AS arrest_rate
                FROM traffic_stops
                WHERE violation IS NOT NULL
                GROUP BY violation
                HAVING COUNT(*) >= 5
            )
            SELECT
                violation,
                total_stops,
                arrests,
                arrest_rate,
                RANK() OVER (ORDER BY arrest_rate DESC) AS rank_by_arrest_rate
            FROM rated
            ORDER BY arrest_rate DESC, violation
            LIMIT 5
        ",
    },
];
