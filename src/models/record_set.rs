use super::record::Record;
use chrono::NaiveDate;

/// Declared schema of every stored record set, in column order.
pub const COLUMNS: [&str; 4] = ["Data/Hora", "Glicémia (mg/dL)", "Insulina (U)", "Notas"];

/// The full ordered collection of records as stored.
///
/// Position is the only identity a record has. Insertion order is kept as-is;
/// chronological order is only imposed by [`RecordSet::sorted_ascending`] and
/// [`RecordSet::sorted_descending`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordSet {
    records: Vec<Record>,
}

/// Aggregates printed under the list table.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub count: usize,
    pub avg_glucose: f64,
    pub min_glucose: f64,
    pub max_glucose: f64,
    pub total_insulin: f64,
}

impl RecordSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn schema() -> &'static [&'static str; 4] {
        &COLUMNS
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn last(&self) -> Option<&Record> {
        self.records.last()
    }

    /// Return a new set equal to `self` with `record` added at the end.
    pub fn append(&self, record: Record) -> RecordSet {
        let mut records = Vec::with_capacity(self.records.len() + 1);
        records.extend_from_slice(&self.records);
        records.push(record);
        RecordSet { records }
    }

    pub fn sorted_ascending(&self) -> Vec<&Record> {
        let mut out: Vec<&Record> = self.records.iter().collect();
        out.sort_by(|a, b| a.chronological_cmp(b));
        out
    }

    pub fn sorted_descending(&self) -> Vec<&Record> {
        let mut out: Vec<&Record> = self.records.iter().collect();
        out.sort_by(|a, b| b.chronological_cmp(a));
        out
    }

    /// Keep the records whose date falls inside `bounds` (inclusive).
    /// `None` keeps everything.
    pub fn within(&self, bounds: Option<(NaiveDate, NaiveDate)>) -> RecordSet {
        match bounds {
            None => self.clone(),
            Some((start, end)) => RecordSet {
                records: self
                    .records
                    .iter()
                    .filter(|r| {
                        let d = r.timestamp.date();
                        d >= start && d <= end
                    })
                    .cloned()
                    .collect(),
            },
        }
    }

    pub fn summary(&self) -> Option<Summary> {
        if self.records.is_empty() {
            return None;
        }

        let count = self.records.len();
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;
        let mut insulin = 0.0;

        for r in &self.records {
            min = min.min(r.glucose);
            max = max.max(r.glucose);
            sum += r.glucose;
            insulin += r.insulin;
        }

        Some(Summary {
            count,
            avg_glucose: sum / count as f64,
            min_glucose: min,
            max_glucose: max,
            total_insulin: insulin,
        })
    }
}

impl<'a> IntoIterator for &'a RecordSet {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
