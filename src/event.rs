use crate::config::EventSchema;
use crate::kinematics::{ELECTRON_MASS, LorentzVector};
use polars::prelude::*;
use std::error::Error;
use std::fmt::Display;
use std::fs::File;
use std::path::Path;
use std::time::Instant;

#[derive(Debug)]
pub enum EventError {
    File(std::io::Error),
    DataFrame(PolarsError),
    MissingColumn(String),
    Ragged { column: String, row: usize },
}

impl From<std::io::Error> for EventError {
    fn from(e: std::io::Error) -> Self {
        Self::File(e)
    }
}

impl From<PolarsError> for EventError {
    fn from(e: PolarsError) -> Self {
        Self::DataFrame(e)
    }
}

impl Display for EventError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File(x) => write!(f, "Event file had an I/O error: {x}"),
            Self::DataFrame(x) => write!(f, "Event file had an error using polars: {x}"),
            Self::MissingColumn(x) => {
                write!(f, "Event file is missing the required column {x}")
            }
            Self::Ragged { column, row } => write!(
                f,
                "Event file column {column} has a different electron count than pt in row {row}"
            ),
        }
    }
}

impl Error for EventError {}

/// A reconstructed electron candidate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Electron {
    pub pt: f64, // GeV
    pub eta: f64,
    pub phi: f64,
    pub mass: f64, // GeV
    pub charge: i32,
    pub cut_based: i32,
}

impl Electron {
    pub fn p4(&self) -> LorentzVector {
        LorentzVector::from_pt_eta_phi_m(self.pt, self.eta, self.phi, self.mass)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Event {
    pub trigger: bool,
    pub electrons: Vec<Electron>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventBatch {
    pub events: Vec<Event>,
}

impl EventBatch {
    pub fn new(events: Vec<Event>) -> Self {
        Self { events }
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.events.iter()
    }

    /// Build events from flattened columns: one boolean trigger column and one list column
    /// per electron field.
    pub fn from_dataframe(df: &DataFrame, schema: &EventSchema) -> Result<Self, EventError> {
        let trigger_column = required_column(df, &schema.trigger)?.cast(&DataType::Boolean)?;
        let triggers = trigger_column.as_materialized_series().bool()?;

        let pt_name = schema.electron_field("pt");
        let pt = float_lists(df, &pt_name)?;
        let eta = float_lists(df, &schema.electron_field("eta"))?;
        let phi = float_lists(df, &schema.electron_field("phi"))?;
        let charge = int_lists(df, &schema.electron_field("charge"))?;
        let cut_based = int_lists(df, &schema.electron_field("cutBased"))?;

        let mass_name = schema.electron_field("mass");
        let mass = if df.get_column_names().iter().any(|name| name.as_str() == mass_name) {
            Some(float_lists(df, &mass_name)?)
        } else {
            None
        };

        let mut events = Vec::with_capacity(df.height());
        for (row, fired) in triggers.into_iter().enumerate() {
            let n = pt[row].len();
            let others = [
                ("eta", eta[row].len()),
                ("phi", phi[row].len()),
                ("charge", charge[row].len()),
                ("cutBased", cut_based[row].len()),
            ];
            if let Some((field, _)) = others.iter().find(|(_, len)| *len != n) {
                return Err(EventError::Ragged {
                    column: schema.electron_field(field),
                    row,
                });
            }
            if let Some(mass) = &mass
                && mass[row].len() != n
            {
                return Err(EventError::Ragged {
                    column: mass_name.clone(),
                    row,
                });
            }

            let electrons = (0..n)
                .map(|i| Electron {
                    pt: pt[row][i],
                    eta: eta[row][i],
                    phi: phi[row][i],
                    mass: mass.as_ref().map_or(ELECTRON_MASS, |m| m[row][i]),
                    charge: charge[row][i],
                    cut_based: cut_based[row][i],
                })
                .collect();

            events.push(Event {
                trigger: fired.unwrap_or(false),
                electrons,
            });
        }

        Ok(Self { events })
    }
}

/// The columns of one input file needed by the selection.
pub struct EventFile {
    df: DataFrame,
    schema: EventSchema,
}

impl EventFile {
    pub fn open(path: &Path, schema: &EventSchema) -> Result<Self, EventError> {
        let start = Instant::now();

        let file = File::open(path)?;
        let mut reader = ParquetReader::new(file);
        let file_schema = reader.schema()?;

        let mut columns = vec![schema.trigger.clone()];
        for field in ["pt", "eta", "phi", "charge", "cutBased", "mass"] {
            columns.push(schema.electron_field(field));
        }
        for column in &columns {
            if !file_schema.contains(column) && *column != schema.electron_field("mass") {
                return Err(EventError::MissingColumn(column.clone()));
            }
        }
        columns.retain(|column| file_schema.contains(column));

        let df = reader.with_columns(Some(columns)).finish()?;

        log::debug!(
            "Read {} events from {} in {:?}",
            df.height(),
            path.display(),
            start.elapsed()
        );

        Ok(Self::from_dataframe(df, schema))
    }

    pub fn from_dataframe(df: DataFrame, schema: &EventSchema) -> Self {
        Self {
            df,
            schema: schema.clone(),
        }
    }

    pub fn number_of_events(&self) -> usize {
        self.df.height()
    }

    /// Consecutive batches of at most `chunk_size` events.
    pub fn batches(
        &self,
        chunk_size: usize,
    ) -> impl Iterator<Item = Result<EventBatch, EventError>> + '_ {
        let chunk_size = chunk_size.max(1);
        (0..self.df.height()).step_by(chunk_size).map(move |offset| {
            let chunk = self.df.slice(offset as i64, chunk_size);
            EventBatch::from_dataframe(&chunk, &self.schema)
        })
    }
}

fn required_column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column, EventError> {
    df.get_column_index(name)
        .map(|index| &df.columns()[index])
        .ok_or_else(|| EventError::MissingColumn(name.to_string()))
}

// Null lists become empty collections, null entries become NaN
fn float_lists(df: &DataFrame, name: &str) -> Result<Vec<Vec<f64>>, EventError> {
    let column =
        required_column(df, name)?.cast(&DataType::List(Box::new(DataType::Float64)))?;
    let mut values = Vec::with_capacity(column.len());
    for sub in column.as_materialized_series().list()?.into_iter() {
        values.push(match sub {
            Some(series) => series
                .f64()?
                .into_iter()
                .map(|v| v.unwrap_or(f64::NAN))
                .collect(),
            None => Vec::new(),
        });
    }
    Ok(values)
}

// Null entries become 0, which fails both the charge and the identification cuts
fn int_lists(df: &DataFrame, name: &str) -> Result<Vec<Vec<i32>>, EventError> {
    let column = required_column(df, name)?.cast(&DataType::List(Box::new(DataType::Int32)))?;
    let mut values = Vec::with_capacity(column.len());
    for sub in column.as_materialized_series().list()?.into_iter() {
        values.push(match sub {
            Some(series) => series.i32()?.into_iter().map(|v| v.unwrap_or(0)).collect(),
            None => Vec::new(),
        });
    }
    Ok(values)
}
