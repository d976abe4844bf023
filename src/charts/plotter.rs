//! Chart Plotter Module
//! Filters the Shaped Table for one dropdown selection and builds the map and
//! bar chart figures.

use crate::charts::figure::{
    Axis, BarTrace, ChoroplethTrace, ColorBar, Figure, Font, Geo, Layout, Margin, Title, Trace,
};
use crate::charts::Selection;
use crate::data::columns::DEMOGRAPHIC;
use crate::data::{Observation, ProcessorError, ShapedTable};
use serde::Serialize;
use tracing::debug;

pub const COLOR_SCALE: &str = "Plasma";
pub const LOCATION_MODE: &str = "USA-states";
pub const MAP_SCOPE: &str = "usa";

const BAR_WIDTH: u32 = 800;
const BAR_HEIGHT: u32 = 400;
const BAR_MARGIN: u32 = 50;
const BAR_FONT_SIZE: u32 = 10;

/// Map dataset: one point per filtered row, keyed by location abbreviation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapData {
    pub indicator: String,
    pub points: Vec<Observation>,
}

/// A single bar: demographic label and its value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    pub demographic: String,
    pub value: f64,
}

/// Bar dataset: one bar per filtered row, no aggregation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub indicator: String,
    pub title: String,
    pub bars: Vec<Bar>,
}

/// The two outputs of one dashboard interaction.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Figures {
    pub us_map: Figure,
    pub indicator_chart: Figure,
}

impl Figures {
    /// Two empty figures, shown until both dropdowns have a value.
    pub fn placeholder() -> Self {
        Self::default()
    }
}

/// Builds chart datasets and figures from the Shaped Table.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Filtered datasets for a selection, or `None` if either dropdown is
    /// still on "No Selection".
    pub fn datasets(
        table: &ShapedTable,
        year: &Selection,
        indicator: &Selection,
    ) -> Result<Option<(MapData, ChartData)>, ProcessorError> {
        let (Some(year), Some(indicator)) = (year.value(), indicator.value()) else {
            return Ok(None);
        };

        let points = table.select(year, indicator)?;
        let bars = points
            .iter()
            .map(|p| Bar {
                demographic: p.demographic.clone(),
                value: p.value,
            })
            .collect();

        let map = MapData {
            indicator: indicator.to_string(),
            points,
        };
        let chart = ChartData {
            indicator: indicator.to_string(),
            title: format!("{indicator} by Demographic"),
            bars,
        };
        Ok(Some((map, chart)))
    }

    /// Handle one dropdown change: always two figures, placeholders when a
    /// selection is missing.
    pub fn update_output(
        table: &ShapedTable,
        year: &Selection,
        indicator: &Selection,
    ) -> Result<Figures, ProcessorError> {
        let Some((map, chart)) = Self::datasets(table, year, indicator)? else {
            debug!(?year, ?indicator, "selection incomplete, returning placeholders");
            return Ok(Figures::placeholder());
        };

        debug!(
            ?year,
            indicator = %map.indicator,
            points = map.points.len(),
            "figures updated"
        );
        Ok(Figures {
            us_map: Self::map_figure(&map),
            indicator_chart: Self::bar_figure(&chart),
        })
    }

    /// Choropleth over U.S. states colored by the indicator value.
    pub fn map_figure(map: &MapData) -> Figure {
        let hovertemplate = format!(
            "<b>%{{hovertext}}</b><br><br>locationabbr=%{{location}}<br>\
             datasource=%{{customdata[0]}}<br>datavaluetype=%{{customdata[1]}}<br>\
             {DEMOGRAPHIC}=%{{customdata[2]}}<br>{}=%{{z}}<extra></extra>",
            map.indicator
        );

        let trace = ChoroplethTrace {
            locations: map.points.iter().map(|p| p.location_abbr.clone()).collect(),
            z: map.points.iter().map(|p| p.value).collect(),
            locationmode: LOCATION_MODE.to_string(),
            colorscale: COLOR_SCALE.to_string(),
            hovertext: map.points.iter().map(|p| p.location_desc.clone()).collect(),
            customdata: map
                .points
                .iter()
                .map(|p| {
                    [
                        p.data_source.clone(),
                        p.value_type.clone(),
                        p.demographic.clone(),
                    ]
                })
                .collect(),
            hovertemplate,
            colorbar: ColorBar {
                title: Title::new(map.indicator.as_str()),
            },
        };

        Figure {
            data: vec![Trace::Choropleth(trace)],
            layout: Layout {
                geo: Some(Geo {
                    scope: MAP_SCOPE.to_string(),
                }),
                ..Layout::default()
            },
        }
    }

    /// Bar chart of value by demographic, y-axis unlabeled.
    pub fn bar_figure(chart: &ChartData) -> Figure {
        let trace = BarTrace {
            x: chart.bars.iter().map(|b| b.demographic.clone()).collect(),
            y: chart.bars.iter().map(|b| b.value).collect(),
            name: chart.indicator.clone(),
            hovertemplate: format!(
                "{DEMOGRAPHIC}=%{{x}}<br>{}=%{{y}}<extra></extra>",
                chart.indicator
            ),
        };

        Figure {
            data: vec![Trace::Bar(trace)],
            layout: Layout {
                title: Some(Title::new(chart.title.as_str())),
                font: Some(Font {
                    size: BAR_FONT_SIZE,
                }),
                width: Some(BAR_WIDTH),
                height: Some(BAR_HEIGHT),
                margin: Some(Margin::uniform(BAR_MARGIN)),
                xaxis: Some(Axis {
                    title: Some(Title::new(DEMOGRAPHIC)),
                    showticklabels: None,
                }),
                yaxis: Some(Axis {
                    title: Some(Title::new("")),
                    showticklabels: Some(false),
                }),
                ..Layout::default()
            },
        }
    }
}

#[cfg(test)]
#[path = "plotter_test.rs"]
mod tests;
