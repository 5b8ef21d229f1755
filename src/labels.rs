//! Chart titles, axis names and report headings.
//!
//! The board is used on Spanish- and English-speaking shop floors, so every
//! user-visible string goes through [`Labels`].

use crate::models::{Cause, CellState, Direction};
use serde::{Deserialize, Serialize};

/// Label language.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// English (default)
    #[default]
    En,
    /// Spanish
    Es,
}

/// Label table for one locale.
#[derive(Debug, Clone, Copy)]
pub struct Labels {
    locale: Locale,
}

impl Labels {
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }

    fn pick(&self, en: &'static str, es: &'static str) -> &'static str {
        match self.locale {
            Locale::En => en,
            Locale::Es => es,
        }
    }

    pub fn gauge_title(&self, indicator: &str) -> String {
        match self.locale {
            Locale::En => format!("Mean of indicator ({})", indicator),
            Locale::Es => format!("Media del Indicador ({})", indicator),
        }
    }

    pub fn control_title(&self, indicator: &str) -> String {
        match self.locale {
            Locale::En => format!("Control chart of {}", indicator),
            Locale::Es => format!("Gráfico de Control de {}", indicator),
        }
    }

    pub fn calendar_title(&self, indicator: &str) -> String {
        match self.locale {
            Locale::En => format!("{} - Results calendar", indicator),
            Locale::Es => format!("{} - Calendario de Resultados", indicator),
        }
    }

    pub fn week_label(&self, week: u32) -> String {
        match self.locale {
            Locale::En => format!("Week {}", week),
            Locale::Es => format!("Semana {}", week),
        }
    }

    pub fn day_axis(&self) -> &'static str {
        self.pick("Day", "Día")
    }

    pub fn result_axis(&self) -> &'static str {
        self.pick("Result", "Resultado")
    }

    pub fn target(&self) -> &'static str {
        self.pick("Target", "Meta")
    }

    pub fn daily_result(&self) -> &'static str {
        self.pick("Daily result", "Resultado Diario")
    }

    pub fn daily_trend(&self) -> &'static str {
        self.pick("Daily trend", "Tendencia Diaria")
    }

    pub fn causes_title(&self) -> &'static str {
        self.pick("Causes of deviations", "Causas de desviaciones")
    }

    pub fn frequency_axis(&self) -> &'static str {
        self.pick("Frequency", "Frecuencia")
    }

    pub fn causes_axis(&self) -> &'static str {
        self.pick("Causes", "Causas")
    }

    pub fn weekday_axis(&self) -> &'static str {
        self.pick("Day of week", "Día de la Semana")
    }

    pub fn week_axis(&self) -> &'static str {
        self.pick("Week of year", "Semana del Año")
    }

    /// Weekday names, Monday first.
    pub fn weekdays(&self) -> [&'static str; 7] {
        match self.locale {
            Locale::En => [
                "Monday",
                "Tuesday",
                "Wednesday",
                "Thursday",
                "Friday",
                "Saturday",
                "Sunday",
            ],
            Locale::Es => [
                "Lunes",
                "Martes",
                "Miércoles",
                "Jueves",
                "Viernes",
                "Sábado",
                "Domingo",
            ],
        }
    }

    pub fn cause(&self, cause: Cause) -> &'static str {
        match cause {
            Cause::Materials => self.pick("Materials", "Materiales"),
            Cause::Methods => self.pick("Methods", "Métodos"),
            Cause::Machinery => self.pick("Machinery", "Maquinaria"),
            Cause::Labor => self.pick("Labor", "Mano de obra"),
            Cause::Environment => self.pick("Environment", "Medio ambiente"),
            Cause::Measurement => self.pick("Measurement", "Medición"),
        }
    }

    pub fn direction(&self, direction: Direction) -> &'static str {
        match direction {
            Direction::LowerIsBetter => self.pick("Lower is better", "Mejor menor"),
            Direction::HigherIsBetter => self.pick("Higher is better", "Mejor mayor"),
        }
    }

    pub fn cell(&self, state: CellState) -> &'static str {
        match state {
            CellState::Compliant => self.pick("Met", "Cumple"),
            CellState::NonCompliant => self.pick("Missed", "No cumple"),
            CellState::NoData => self.pick("No data", "Sin datos"),
        }
    }

    pub fn no_trend_data(&self) -> &'static str {
        self.pick(
            "Not enough data to show the control chart.",
            "No hay suficientes datos para mostrar el gráfico de control.",
        )
    }

    pub fn daily_tracking(&self) -> &'static str {
        self.pick("Daily tracking", "Seguimiento diario")
    }

    pub fn causes_section(&self) -> &'static str {
        self.pick(
            "Frequent causes and days with largest deviations",
            "Causas frecuentes y días con mayores desvíos",
        )
    }

    pub fn entered_data(&self) -> &'static str {
        self.pick("Entered data", "Datos ingresados")
    }

    pub fn mean(&self) -> &'static str {
        self.pick("Mean", "Media")
    }

    pub fn gap(&self) -> &'static str {
        self.pick("Gap", "Desvío")
    }

    pub fn compliance_rate(&self) -> &'static str {
        self.pick("Compliance rate", "Tasa de cumplimiento")
    }

    pub fn status(&self) -> &'static str {
        self.pick("Status", "Estado")
    }

    pub fn month(&self) -> &'static str {
        self.pick("Month", "Mes")
    }

    pub fn days_with_data(&self) -> &'static str {
        self.pick("Days with data", "Días con datos")
    }
}
