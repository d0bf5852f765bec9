//! Reading noise datasets from CSV and writing labeled results back.

use crate::error::{ProcessingError, Result};
use crate::{CLUSTER_COLUMN, DAY_COLUMN, Matrix, NIGHT_COLUMN};
use ndarray::ArrayView1;
use std::io::Read;
use std::path::Path;

/// Field values treated as missing.
const MISSING_TOKENS: &[&str] = &[
    "", "NA", "N/A", "n/a", "#N/A", "#N/A N/A", "#NA", "NaN", "nan", "-NaN", "-nan",
    "null", "NULL", "None", "<NA>", "-1.#IND", "1.#QNAN", "-1.#QNAN", "1.#IND",
];

/// How the values of a column were written in the source file.
///
/// A column keeps the integer form only if every row held an integer and no
/// row was missing; anything else is exported as a float.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnKind {
    Integer,
    Float,
}

impl ColumnKind {
    fn infer<I: IntoIterator<Item = f64>>(values: I) -> Self {
        let all_integral = values
            .into_iter()
            .all(|v| v.is_finite() && v.fract() == 0.0 && v.abs() < 9.0e15);
        if all_integral {
            ColumnKind::Integer
        } else {
            ColumnKind::Float
        }
    }

    pub fn format(self, value: f64) -> String {
        match self {
            ColumnKind::Integer => format!("{}", value as i64),
            ColumnKind::Float => float_repr(value),
        }
    }
}

/// Shortest round-trip text for a float, positional for decimal exponents in
/// `-4..16` and scientific (`1e-05`, `2.5e+16`) outside it. Integral values
/// keep a trailing `.0`.
pub fn float_repr(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        let text = if value > 0.0 { "inf" } else { "-inf" };
        return text.to_string();
    }

    let scientific = format!("{:e}", value);
    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((scientific.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if value != 0.0 && !(-4..16).contains(&exponent) {
        let sign = if exponent < 0 { '-' } else { '+' };
        return format!("{}e{}{:02}", mantissa, sign, exponent.abs());
    }

    let positional = format!("{}", value);
    if positional.contains('.') {
        positional
    } else {
        positional + ".0"
    }
}

/// `None` for a missing-value token, `Some(Err(()))` for anything that is not
/// a finite number.
fn parse_field(field: &str) -> Option<std::result::Result<f64, ()>> {
    let trimmed = field.trim();
    if MISSING_TOKENS.contains(&trimmed) {
        return None;
    }
    Some(
        trimmed
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or(()),
    )
}

fn column_index(headers: &csv::StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| ProcessingError::MissingColumn(name.to_string()))
}

/// Clean two-column table: only rows where both values are present.
#[derive(Clone, Debug)]
pub struct NoiseDataset {
    features: Matrix,
    columns: [String; 2],
    kinds: [ColumnKind; 2],
    raw_rows: usize,
}

impl NoiseDataset {
    /// Reads `Day` and `Night` from a CSV with a header row.
    pub fn from_csv<R: Read>(reader: R) -> Result<Self> {
        Self::from_csv_reader(reader, DAY_COLUMN, NIGHT_COLUMN)
    }

    /// Short rows are accepted and their absent trailing fields count as
    /// missing. A row longer than the header is an error.
    pub fn from_csv_reader<R: Read>(reader: R, x_column: &str, y_column: &str) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        let indices = [column_index(&headers, x_column)?, column_index(&headers, y_column)?];
        let names = [x_column, y_column];

        let mut raw_rows = 0;
        let mut integer_form = [true, true];
        let mut values = Vec::new();

        for (row, record) in rdr.records().enumerate() {
            let record = record?;
            raw_rows += 1;

            if record.len() > headers.len() {
                return Err(ProcessingError::ExtraFields {
                    row: row + 1,
                    expected: headers.len(),
                    found: record.len(),
                });
            }

            let mut pair = [None, None];
            for j in 0..2 {
                let field = record.get(indices[j]).unwrap_or("");
                match parse_field(field) {
                    None => integer_form[j] = false,
                    Some(Ok(v)) => {
                        if field.trim().parse::<i64>().is_err() {
                            integer_form[j] = false;
                        }
                        pair[j] = Some(v);
                    }
                    Some(Err(())) => {
                        return Err(ProcessingError::NonNumeric {
                            column: names[j].to_string(),
                            row: row + 1,
                            value: field.to_string(),
                        });
                    }
                }
            }

            if let [Some(x), Some(y)] = pair {
                values.push(x);
                values.push(y);
            }
        }

        let n = values.len() / 2;
        let features = Matrix::from_shape_vec((n, 2), values)
            .map_err(|e| ProcessingError::Clustering(e.to_string()))?;
        let kind = |integer: bool| if integer { ColumnKind::Integer } else { ColumnKind::Float };

        tracing::debug!("Read {} rows, kept {} with both values", raw_rows, n);

        Ok(Self {
            features,
            columns: [x_column.to_string(), y_column.to_string()],
            kinds: [kind(integer_form[0]), kind(integer_form[1])],
            raw_rows,
        })
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path.as_ref())?;
        Self::from_csv(file)
    }

    /// Builds a dataset from in-memory `(day, night)` pairs.
    pub fn from_pairs(pairs: &[(f64, f64)]) -> Self {
        let features = Matrix::from_shape_fn((pairs.len(), 2), |(i, j)| {
            if j == 0 { pairs[i].0 } else { pairs[i].1 }
        });
        let kinds = [
            ColumnKind::infer(pairs.iter().map(|p| p.0)),
            ColumnKind::infer(pairs.iter().map(|p| p.1)),
        ];

        Self {
            features,
            columns: [DAY_COLUMN.to_string(), NIGHT_COLUMN.to_string()],
            kinds,
            raw_rows: pairs.len(),
        }
    }

    pub fn features(&self) -> &Matrix {
        &self.features
    }

    pub fn x_values(&self) -> ArrayView1<'_, f64> {
        self.features.column(0)
    }

    pub fn y_values(&self) -> ArrayView1<'_, f64> {
        self.features.column(1)
    }

    pub fn columns(&self) -> [&str; 2] {
        [&self.columns[0], &self.columns[1]]
    }

    pub fn kinds(&self) -> [ColumnKind; 2] {
        self.kinds
    }

    pub fn len(&self) -> usize {
        self.features.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of data rows in the source, before dropping incomplete ones.
    pub fn raw_rows(&self) -> usize {
        self.raw_rows
    }

    pub fn dropped_rows(&self) -> usize {
        self.raw_rows - self.len()
    }
}

/// Clean dataset with one cluster label per row.
#[derive(Clone, Debug)]
pub struct LabeledDataset {
    data: NoiseDataset,
    labels: Vec<i32>,
}

impl LabeledDataset {
    pub fn new(data: NoiseDataset, labels: Vec<i32>) -> Result<Self> {
        if data.len() != labels.len() {
            return Err(ProcessingError::Clustering(format!(
                "got {} labels for {} rows",
                labels.len(),
                data.len()
            )));
        }
        Ok(Self { data, labels })
    }

    pub fn data(&self) -> &NoiseDataset {
        &self.data
    }

    pub fn labels(&self) -> &[i32] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = (f64, f64, i32)> + '_ {
        self.data
            .x_values()
            .into_iter()
            .zip(self.data.y_values())
            .zip(self.labels.iter())
            .map(|((&x, &y), &label)| (x, y, label))
    }

    /// Serializes as `Day,Night,cluster`, one row per record, no index column.
    pub fn to_csv_string(&self) -> Result<String> {
        let mut wtr = csv::WriterBuilder::new()
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(Vec::new());

        let [x_name, y_name] = self.data.columns();
        wtr.write_record([x_name, y_name, CLUSTER_COLUMN])?;

        let [x_kind, y_kind] = self.data.kinds();
        for (x, y, label) in self.rows() {
            wtr.write_record([x_kind.format(x), y_kind.format(y), label.to_string()])?;
        }

        let bytes = wtr.into_inner().map_err(|e| ProcessingError::Io(e.into_error()))?;
        String::from_utf8(bytes)
            .map_err(|e| ProcessingError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
    }

    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path.as_ref(), self.to_csv_string()?)?;
        Ok(())
    }

    /// Reads back a CSV produced by [`LabeledDataset::to_csv_string`].
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        let names = [DAY_COLUMN, NIGHT_COLUMN, CLUSTER_COLUMN];
        let indices = [
            column_index(&headers, names[0])?,
            column_index(&headers, names[1])?,
            column_index(&headers, names[2])?,
        ];

        let mut pairs = Vec::new();
        let mut labels = Vec::new();
        let mut integer_form = [true, true];

        for (row, record) in rdr.records().enumerate() {
            let record = record?;
            let non_numeric = |j: usize| ProcessingError::NonNumeric {
                column: names[j].to_string(),
                row: row + 1,
                value: record.get(indices[j]).unwrap_or("").to_string(),
            };

            let mut pair = [0.0; 2];
            for j in 0..2 {
                let field = record.get(indices[j]).unwrap_or("");
                pair[j] = match parse_field(field) {
                    Some(Ok(v)) => v,
                    _ => return Err(non_numeric(j)),
                };
                if field.trim().parse::<i64>().is_err() {
                    integer_form[j] = false;
                }
            }

            let label = record
                .get(indices[2])
                .and_then(|f| f.trim().parse::<i32>().ok())
                .ok_or_else(|| non_numeric(2))?;

            pairs.push((pair[0], pair[1]));
            labels.push(label);
        }

        let mut data = NoiseDataset::from_pairs(&pairs);
        let kind = |integer: bool| if integer { ColumnKind::Integer } else { ColumnKind::Float };
        data.kinds = [kind(integer_form[0]), kind(integer_form[1])];

        Self::new(data, labels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NOISE;

    #[test]
    fn test_reads_day_and_night() {
        let csv = "Station,Day,Night,Month\nA,40,30,1\nB,41,31,1\nC,90,80,2\n";
        let data = NoiseDataset::from_csv(csv.as_bytes()).unwrap();

        assert_eq!(data.len(), 3);
        assert_eq!(data.raw_rows(), 3);
        assert_eq!(data.x_values().to_vec(), vec![40.0, 41.0, 90.0]);
        assert_eq!(data.y_values().to_vec(), vec![30.0, 31.0, 80.0]);
        assert_eq!(data.kinds(), [ColumnKind::Integer, ColumnKind::Integer]);
    }

    #[test]
    fn test_drops_rows_with_missing_values() {
        let csv = "Day,Night\n40,30\n,31\n90,NA\n55.5,45\n60,\n";
        let data = NoiseDataset::from_csv(csv.as_bytes()).unwrap();

        assert_eq!(data.raw_rows(), 5);
        assert_eq!(data.len(), 2);
        assert_eq!(data.dropped_rows(), 3);
        assert_eq!(data.x_values().to_vec(), vec![40.0, 55.5]);
        assert_eq!(data.kinds(), [ColumnKind::Float, ColumnKind::Float]);
    }

    #[test]
    fn test_missing_values_in_other_columns_are_ignored() {
        let csv = "Day,Night,Note\n40,30,\n41,31,NA\n";
        let data = NoiseDataset::from_csv(csv.as_bytes()).unwrap();
        assert_eq!(data.len(), 2);
    }

    #[test]
    fn test_missing_column() {
        let csv = "Day,Evening\n40,30\n";
        let err = NoiseDataset::from_csv(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, ProcessingError::MissingColumn(ref c) if c == "Night"));
    }

    #[test]
    fn test_non_numeric_value() {
        let csv = "Day,Night\n40,30\nloud,31\n";
        let err = NoiseDataset::from_csv(csv.as_bytes()).unwrap_err();
        match err {
            ProcessingError::NonNumeric { column, row, value } => {
                assert_eq!(column, "Day");
                assert_eq!(row, 2);
                assert_eq!(value, "loud");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_non_finite_values_are_rejected() {
        for value in ["inf", "-inf", "Infinity", "1e400", "NAN"] {
            let csv = format!("Day,Night\n40,30\n41,31\n42,32\n{},33\n", value);
            match NoiseDataset::from_csv(csv.as_bytes()).unwrap_err() {
                ProcessingError::NonNumeric { column, row, value: found } => {
                    assert_eq!(column, "Day");
                    assert_eq!(row, 4);
                    assert_eq!(found, value);
                }
                other => panic!("unexpected error for {value}: {other}"),
            }
        }
    }

    #[test]
    fn test_short_rows_count_as_missing() {
        let csv = "Station,Day,Night\nA,40,30\nB,41,31\nC,42\n";
        let data = NoiseDataset::from_csv(csv.as_bytes()).unwrap();

        assert_eq!(data.raw_rows(), 3);
        assert_eq!(data.len(), 2);
        assert_eq!(data.x_values().to_vec(), vec![40.0, 41.0]);
        assert_eq!(data.kinds(), [ColumnKind::Integer, ColumnKind::Float]);
    }

    #[test]
    fn test_long_rows_are_rejected() {
        let csv = "Day,Night\n40,30\n41,31,7\n";
        let err = NoiseDataset::from_csv(csv.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            ProcessingError::ExtraFields { row: 2, expected: 2, found: 3 }
        ));
    }

    #[test]
    fn test_invalid_utf8_is_a_csv_error() {
        let err = NoiseDataset::from_csv(&b"Day,Night\n40,\xff\n"[..]).unwrap_err();
        assert!(matches!(err, ProcessingError::Csv(_)));
    }

    #[test]
    fn test_header_only() {
        let data = NoiseDataset::from_csv("Day,Night\n".as_bytes()).unwrap();
        assert!(data.is_empty());
        assert_eq!(data.raw_rows(), 0);
    }

    #[test]
    fn test_column_kind_format() {
        assert_eq!(ColumnKind::Integer.format(40.0), "40");
        assert_eq!(ColumnKind::Float.format(40.0), "40.0");
        assert_eq!(ColumnKind::Float.format(40.25), "40.25");
        assert_eq!(ColumnKind::Float.format(-3.0), "-3.0");
    }

    #[test]
    fn test_float_repr_switches_to_scientific() {
        assert_eq!(float_repr(0.00001), "1e-05");
        assert_eq!(float_repr(0.0001), "0.0001");
        assert_eq!(float_repr(0.000125), "0.000125");
        assert_eq!(float_repr(1.5e-7), "1.5e-07");
        assert_eq!(float_repr(1e15), "1000000000000000.0");
        assert_eq!(float_repr(1e16), "1e+16");
        assert_eq!(float_repr(-2.5e20), "-2.5e+20");
        assert_eq!(float_repr(1e100), "1e+100");
        assert_eq!(float_repr(0.0), "0.0");
        assert_eq!(float_repr(0.5), "0.5");
    }

    #[test]
    fn test_export_layout() {
        let data = NoiseDataset::from_pairs(&[(40.0, 30.0), (41.0, 31.0), (90.0, 80.0)]);
        let labeled = LabeledDataset::new(data, vec![0, 0, NOISE]).unwrap();

        assert_eq!(
            labeled.to_csv_string().unwrap(),
            "Day,Night,cluster\n40,30,0\n41,31,0\n90,80,-1\n"
        );
    }

    #[test]
    fn test_export_keeps_float_form_after_dropping_rows() {
        let csv = "Day,Night\n40,30\n41,\n52,42\n";
        let data = NoiseDataset::from_csv(csv.as_bytes()).unwrap();
        let labeled = LabeledDataset::new(data, vec![0, 1]).unwrap();

        assert_eq!(
            labeled.to_csv_string().unwrap(),
            "Day,Night,cluster\n40,30.0,0\n52,42.0,1\n"
        );
    }

    #[test]
    fn test_export_round_trip() {
        let csv = "Day,Night\n40.5,30\n41,31\n,12\n90.125,80\n";
        let data = NoiseDataset::from_csv(csv.as_bytes()).unwrap();
        let labeled = LabeledDataset::new(data, vec![3, 3, NOISE]).unwrap();

        let exported = labeled.to_csv_string().unwrap();
        let decoded = LabeledDataset::from_csv_reader(exported.as_bytes()).unwrap();

        assert_eq!(decoded.labels(), labeled.labels());
        assert_eq!(decoded.data().features(), labeled.data().features());
        assert_eq!(decoded.to_csv_string().unwrap(), exported);
    }

    #[test]
    fn test_label_count_mismatch() {
        let data = NoiseDataset::from_pairs(&[(1.0, 2.0)]);
        assert!(LabeledDataset::new(data, vec![0, 1]).is_err());
    }

    #[test]
    fn test_write_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(crate::EXPORT_FILENAME);

        let data = NoiseDataset::from_pairs(&[(55.0, 44.0)]);
        let labeled = LabeledDataset::new(data, vec![NOISE]).unwrap();
        labeled.write_csv(&path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, "Day,Night,cluster\n55,44,-1\n");
    }
}
