// io.rs

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Seek, Write};
use std::path::{Path, PathBuf};

use crate::{error::BinningError, multi::ChannelInfo};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];
const DEFAULT_BUFFER_SIZE: usize = 128 * 1024;

pub struct InputStream {
    filepath: PathBuf,
}

impl InputStream {
    pub fn new(filepath: &Path) -> Self {
        Self {
            filepath: filepath.into(),
        }
    }

    fn is_gzipped(file: &mut File) -> io::Result<bool> {
        let mut header = [0u8; 2];
        // Files shorter than the magic number are plain text.
        let is_gz = match file.read_exact(&mut header) {
            Ok(()) => header == GZIP_MAGIC,
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => false,
            Err(e) => return Err(e),
        };
        file.rewind()?;
        Ok(is_gz)
    }

    pub fn reader(&self) -> io::Result<BufReader<Box<dyn Read>>> {
        let mut file = File::open(&self.filepath)?;
        let reader: Box<dyn Read> = if Self::is_gzipped(&mut file)? {
            Box::new(GzDecoder::new(file))
        } else {
            Box::new(file)
        };
        Ok(BufReader::with_capacity(DEFAULT_BUFFER_SIZE, reader))
    }
}

#[derive(Clone)]
pub struct OutputStreamBuilder {
    filepath: Option<PathBuf>,
    buffer_size: usize,
    compression_level: Compression,
}

impl Default for OutputStreamBuilder {
    fn default() -> Self {
        Self {
            filepath: None,
            buffer_size: DEFAULT_BUFFER_SIZE,
            compression_level: Compression::default(),
        }
    }
}

impl OutputStreamBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filepath(mut self, path: Option<impl AsRef<Path>>) -> Self {
        self.filepath = path.map(|p| p.as_ref().to_path_buf());
        self
    }

    pub fn buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size;
        self
    }

    pub fn compression_level(mut self, level: Compression) -> Self {
        self.compression_level = level;
        self
    }

    pub fn build(self) -> OutputStream {
        OutputStream {
            filepath: self.filepath,
            buffer_size: self.buffer_size,
            compression_level: self.compression_level,
        }
    }
}

/// A buffered output file, gzip-compressed when the path ends in `.gz`, or stdout
/// when no path is given.
pub struct OutputStream {
    filepath: Option<PathBuf>,
    buffer_size: usize,
    compression_level: Compression,
}

impl OutputStream {
    pub fn new(filepath: Option<impl AsRef<Path>>) -> Self {
        OutputStreamBuilder::new().filepath(filepath).build()
    }

    pub fn builder() -> OutputStreamBuilder {
        OutputStreamBuilder::new()
    }

    fn should_compress(&self) -> bool {
        self.filepath
            .as_ref()
            .is_some_and(|p| p.extension().is_some_and(|ext| ext == "gz"))
    }

    pub fn writer(&self) -> io::Result<Box<dyn Write>> {
        match &self.filepath {
            Some(path) => {
                let file = File::create(path)?;
                let writer: Box<dyn Write> = if self.should_compress() {
                    Box::new(BufWriter::with_capacity(
                        self.buffer_size,
                        GzEncoder::new(file, self.compression_level),
                    ))
                } else {
                    Box::new(BufWriter::with_capacity(self.buffer_size, file))
                };
                Ok(writer)
            }
            None => Ok(Box::new(BufWriter::with_capacity(
                self.buffer_size,
                io::stdout(),
            ))),
        }
    }
}

/// Configuration for reading multi-channel sample tables.
#[derive(Debug, Clone)]
pub struct BatchReaderConfig {
    /// Maximum rows (events) per batch.
    pub batch_size: usize,
    /// Lines starting with this byte are skipped.
    pub comment: Option<u8>,
    /// Column holding a per-row weight shared by all channels; every other column
    /// is a channel.
    pub weight_column: Option<usize>,
}

impl Default for BatchReaderConfig {
    fn default() -> Self {
        Self {
            batch_size: 10_000,
            comment: Some(b'#'),
            weight_column: None,
        }
    }
}

/// One batch of samples laid out channel-major, ready for a multi-channel `bin` call.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelBatch {
    pub channels: Vec<Vec<f64>>,
    pub weights: Option<Vec<f64>>,
}

impl ChannelBatch {
    pub fn n_samples(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }
}

/// Reads a tab-separated table with one row per event and one column per channel,
/// transposing it into channel-major batches.
pub struct ChannelBatchReader<R: Read> {
    records: csv::StringRecordsIntoIter<R>,
    config: BatchReaderConfig,
    n_channels: Option<usize>,
    line: usize,
}

impl ChannelBatchReader<BufReader<Box<dyn Read>>> {
    /// Open a plain or gzip-compressed file.
    pub fn open(path: &Path, config: BatchReaderConfig) -> Result<Self, BinningError> {
        let reader = InputStream::new(path).reader()?;
        Ok(Self::from_reader(reader, config))
    }
}

impl<R: Read> ChannelBatchReader<R> {
    pub fn from_reader(reader: R, config: BatchReaderConfig) -> Self {
        let records = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .comment(config.comment)
            .flexible(true)
            .from_reader(reader)
            .into_records();
        Self {
            records,
            config,
            n_channels: None,
            line: 0,
        }
    }

    /// Number of channels, known once the first row has been read.
    pub fn n_channels(&self) -> Option<usize> {
        self.n_channels
    }

    /// Read up to `batch_size` rows. Returns `None` once the input is exhausted.
    pub fn next_batch(&mut self) -> Result<Option<ChannelBatch>, BinningError> {
        let mut channels: Vec<Vec<f64>> = Vec::new();
        let mut weights = self.config.weight_column.map(|_| Vec::new());
        let mut rows = 0;

        while rows < self.config.batch_size {
            let Some(record) = self.records.next() else {
                break;
            };
            let record = record?;
            self.line += 1;

            let n_fields = record.len();
            let n_row_channels = match self.config.weight_column {
                Some(col) if col >= n_fields => {
                    return Err(format!(
                        "line {}: weight column {} missing ({} fields)",
                        self.line, col, n_fields
                    )
                    .into());
                }
                Some(_) => n_fields - 1,
                None => n_fields,
            };

            let expected = *self.n_channels.get_or_insert(n_row_channels);
            if n_row_channels != expected {
                return Err(BinningError::ChannelCountMismatch {
                    expected,
                    found: n_row_channels,
                });
            }
            if channels.is_empty() {
                channels = vec![Vec::with_capacity(self.config.batch_size); expected];
            }

            let mut channel = 0;
            for (col, field) in record.iter().enumerate() {
                let value: f64 = field.trim().parse()?;
                if Some(col) == self.config.weight_column {
                    if let Some(weights) = weights.as_mut() {
                        weights.push(value);
                    }
                } else {
                    channels[channel].push(value);
                    channel += 1;
                }
            }
            rows += 1;
        }

        if rows == 0 {
            return Ok(None);
        }
        Ok(Some(ChannelBatch { channels, weights }))
    }
}

impl<R: Read> Iterator for ChannelBatchReader<R> {
    type Item = Result<ChannelBatch, BinningError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_batch().transpose()
    }
}

#[derive(Debug, Serialize)]
struct TableRow {
    channel: usize,
    lower: f64,
    upper: f64,
    center: f64,
    count: f64,
}

/// Write one tab-separated row per (channel, bin) with a header line.
pub fn write_channel_table<W: Write>(
    writer: W,
    info: &BTreeMap<usize, ChannelInfo>,
) -> Result<(), BinningError> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_writer(writer);

    for (&channel, channel_info) in info {
        let bounds = channel_info.bin_edges.windows(2);
        for ((bounds, &center), &count) in bounds
            .zip(&channel_info.bin_centers)
            .zip(&channel_info.hist)
        {
            writer.serialize(TableRow {
                channel,
                lower: bounds[0],
                upper: bounds[1],
                center,
                count,
            })?;
        }
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestDir;

    fn make_test_table() -> &'static str {
        "# events\n0.5\t1.5\t1.0\n1.5\t2.5\t2.0\n2.5\t0.5\t0.5\n"
    }

    #[test]
    fn test_batches() {
        let config = BatchReaderConfig {
            batch_size: 2,
            ..Default::default()
        };
        let mut reader = ChannelBatchReader::from_reader(make_test_table().as_bytes(), config);

        let first = reader.next_batch().unwrap().unwrap();
        assert_eq!(reader.n_channels(), Some(3));
        assert_eq!(first.n_samples(), 2);
        assert_eq!(
            first.channels,
            vec![vec![0.5, 1.5], vec![1.5, 2.5], vec![1.0, 2.0]]
        );
        assert_eq!(first.weights, None);

        let second = reader.next_batch().unwrap().unwrap();
        assert_eq!(second.channels, vec![vec![2.5], vec![0.5], vec![0.5]]);
        assert!(reader.next_batch().unwrap().is_none());
    }

    #[test]
    fn test_weight_column() {
        let config = BatchReaderConfig {
            weight_column: Some(2),
            ..Default::default()
        };
        let batches: Vec<_> = ChannelBatchReader::from_reader(make_test_table().as_bytes(), config)
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(batches.len(), 1);
        assert_eq!(
            batches[0].channels,
            vec![vec![0.5, 1.5, 2.5], vec![1.5, 2.5, 0.5]]
        );
        assert_eq!(batches[0].weights, Some(vec![1.0, 2.0, 0.5]));
    }

    #[test]
    fn test_ragged_rows() {
        let table = "1.0\t2.0\n3.0\n";
        let mut reader = ChannelBatchReader::from_reader(table.as_bytes(), Default::default());
        assert!(matches!(
            reader.next_batch(),
            Err(BinningError::ChannelCountMismatch {
                expected: 2,
                found: 1
            })
        ));
    }

    #[test]
    fn test_bad_value() {
        let table = "1.0\tabc\n";
        let mut reader = ChannelBatchReader::from_reader(table.as_bytes(), Default::default());
        assert!(matches!(
            reader.next_batch(),
            Err(BinningError::ParseFloatError(_))
        ));
    }

    #[test]
    fn test_gzip_input() {
        let dir = TestDir::new("gzip_input").unwrap();
        let path = dir.path().join("events.tsv.gz");
        let mut encoder = GzEncoder::new(File::create(&path).unwrap(), Compression::default());
        encoder.write_all(make_test_table().as_bytes()).unwrap();
        encoder.finish().unwrap();

        let mut reader = ChannelBatchReader::open(&path, Default::default()).unwrap();
        let batch = reader.next_batch().unwrap().unwrap();
        assert_eq!(batch.n_samples(), 3);
        assert_eq!(batch.channels[1], vec![1.5, 2.5, 0.5]);
    }

    #[test]
    fn test_plain_input_file() {
        let dir = TestDir::new("plain_input").unwrap();
        let path = dir.write_file("events.tsv", make_test_table()).unwrap();
        let batches: Vec<_> = ChannelBatchReader::open(&path, Default::default())
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(batches[0].channels[0], vec![0.5, 1.5, 2.5]);
    }

    #[test]
    fn test_write_channel_table() {
        let mut info = BTreeMap::new();
        info.insert(
            0,
            ChannelInfo {
                bin_centers: vec![0.5, 1.5],
                hist: vec![2.0, 1.0],
                bin_edges: vec![0.0, 1.0, 2.0],
            },
        );
        info.insert(
            1,
            ChannelInfo {
                bin_centers: vec![5.0],
                hist: vec![0.0],
                bin_edges: vec![0.0, 10.0],
            },
        );

        let mut buf = Vec::new();
        write_channel_table(&mut buf, &info).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "channel\tlower\tupper\tcenter\tcount");
        assert_eq!(lines[1], "0\t0.0\t1.0\t0.5\t2.0");
        assert_eq!(lines[2], "0\t1.0\t2.0\t1.5\t1.0");
        assert_eq!(lines[3], "1\t0.0\t10.0\t5.0\t0.0");
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn test_output_builder() {
        let dir = TestDir::new("output_builder").unwrap();
        let path = dir.path().join("out.tsv.gz");
        {
            let mut writer = OutputStream::builder()
                .filepath(Some(&path))
                .buffer_size(16)
                .compression_level(Compression::best())
                .build()
                .writer()
                .unwrap();
            writer.write_all(b"0\t1\n1\t2\n").unwrap();
            writer.flush().unwrap();
        }
        let mut text = String::new();
        InputStream::new(&path)
            .reader()
            .unwrap()
            .read_to_string(&mut text)
            .unwrap();
        assert_eq!(text, "0\t1\n1\t2\n");
    }

    #[test]
    fn test_gzip_output() {
        let dir = TestDir::new("gzip_output").unwrap();
        let path = dir.path().join("out.tsv.gz");
        {
            let mut writer = OutputStream::new(Some(&path)).writer().unwrap();
            writer.write_all(b"0\t1\n").unwrap();
            writer.flush().unwrap();
        }
        let mut text = String::new();
        InputStream::new(&path)
            .reader()
            .unwrap()
            .read_to_string(&mut text)
            .unwrap();
        assert_eq!(text, "0\t1\n");
    }
}
