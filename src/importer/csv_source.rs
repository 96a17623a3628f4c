// ==========================================
// URL 重写导入 - CSV 行读取
// ==========================================
// 职责: 按方言逐行读取 CSV，产出原始行（惰性、只读一遍）
// 分帧: 按物理行切分；空行产出无单元格的行
//       length > 0 时，超长行按 length 字节切成多段，各段单独成行；
//       包围符内不切分，改为读到包围符闭合后的行尾
// 转义: 包围符内的转义字符连同其后字符原样保留在单元格中
// 解析: 每段交给 csv 读取器拆分单元格，单元格按 UTF-8 宽松解码
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use crate::importer::import_config::CsvDialect;
use csv::{ByteRecord, ReaderBuilder, Terminator};
use std::fs::File;
use std::io::{BufReader, Bytes, Read};
use std::path::Path;
use tracing::error;

// ==========================================
// RawRow - 原始行
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    line: u64, // 起始物理行号（从 1 开始）
    cells: Vec<String>,
}

impl RawRow {
    pub fn new(line: u64, cells: Vec<String>) -> Self {
        Self { line, cells }
    }

    pub fn line(&self) -> u64 {
        self.line
    }

    /// 取单元格；下标越界返回 None
    pub fn cell(&self, index: usize) -> Option<&str> {
        self.cells.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// 空行
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for RawRow {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(0, iter.into_iter().map(Into::into).collect())
    }
}

// ==========================================
// 分帧状态
// ==========================================
#[derive(Debug, Default)]
struct FrameState {
    in_quotes: bool,
    field_start: bool,
    just_closed: bool,
    escaped: bool,
}

/// 一段待解析的字节（转义已改写为 csv 读取器的写法）
struct Chunk {
    bytes: Vec<u8>,
    newlines: u64,
}

// ==========================================
// CsvRowSource - 行迭代器
// ==========================================
pub struct CsvRowSource {
    input: Bytes<BufReader<File>>,
    parser: ReaderBuilder,
    delimiter: u8,
    enclosure: u8,
    escape: Option<u8>,
    max_length: usize,
    next_line: u64,
    finished: bool,
}

impl CsvRowSource {
    /// 打开文件
    pub fn open(path: &Path, dialect: &CsvDialect) -> ImportResult<Self> {
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }

        let file = File::open(path)?;

        // 转义字符与包围符相同时只保留双写包围符规则
        let escape = (dialect.escape != dialect.enclosure).then_some(dialect.escape);

        let mut parser = ReaderBuilder::new();
        parser
            .has_headers(false)
            .flexible(true) // 允许行长度不一致
            .delimiter(dialect.delimiter)
            .quote(dialect.enclosure)
            .escape(escape)
            .terminator(Terminator::Any(b'\n'));

        Ok(Self {
            input: BufReader::new(file).bytes(),
            parser,
            delimiter: dialect.delimiter,
            enclosure: dialect.enclosure,
            escape,
            max_length: dialect.max_length,
            next_line: 1,
            finished: false,
        })
    }

    /// 读取下一行；流结束返回 None
    fn read_row(&mut self) -> ImportResult<Option<RawRow>> {
        let line = self.next_line;
        let chunk = match self.read_chunk()? {
            Some(chunk) => chunk,
            None => return Ok(None),
        };
        self.next_line += chunk.newlines;

        let content = strip_line_end(&chunk.bytes);
        if content.is_empty() {
            return Ok(Some(RawRow::new(line, Vec::new())));
        }

        let mut reader = self.parser.from_reader(content);
        let mut record = ByteRecord::new();
        if !reader.read_byte_record(&mut record)? {
            return Ok(Some(RawRow::new(line, Vec::new())));
        }

        let cells = record
            .iter()
            .map(|field| String::from_utf8_lossy(field).into_owned())
            .collect();
        Ok(Some(RawRow::new(line, cells)))
    }

    /// 切出一段
    ///
    /// 包围符外遇到换行结束；达到 max_length 字节时在包围符外切分，
    /// 在包围符内则取消长度限制直到行尾。
    fn read_chunk(&mut self) -> ImportResult<Option<Chunk>> {
        let mut bytes = Vec::new();
        let mut newlines = 0u64;
        let mut consumed = 0usize;
        let mut unbounded = false;
        let mut state = FrameState {
            field_start: true,
            ..FrameState::default()
        };

        while let Some(byte) = self.input.next() {
            let byte = byte?;
            consumed += 1;
            if byte == b'\n' {
                newlines += 1;
            }

            if state.in_quotes {
                self.push_quoted(&mut state, &mut bytes, byte);
            } else {
                bytes.push(byte);
                let opens = byte == self.enclosure && (state.field_start || state.just_closed);
                state.just_closed = false;
                state.field_start = byte == self.delimiter;
                if opens {
                    state.in_quotes = true;
                }
                if byte == b'\n' {
                    break;
                }
            }

            if self.max_length > 0 && !unbounded && consumed >= self.max_length {
                if state.in_quotes {
                    unbounded = true;
                } else {
                    break;
                }
            }
        }

        if consumed == 0 {
            return Ok(None);
        }
        Ok(Some(Chunk { bytes, newlines }))
    }

    /// 包围符内的字节
    ///
    /// csv 读取器会吞掉转义字符，这里把 `E X` 改写成能还原出 `E X` 的形式。
    fn push_quoted(&self, state: &mut FrameState, bytes: &mut Vec<u8>, byte: u8) {
        let escape = match self.escape {
            Some(escape) => escape,
            None => {
                bytes.push(byte);
                if byte == self.enclosure {
                    state.in_quotes = false;
                    state.just_closed = true;
                }
                return;
            }
        };

        if state.escaped {
            state.escaped = false;
            if byte == self.enclosure || byte == escape {
                bytes.push(escape);
            }
            bytes.push(byte);
        } else if byte == escape {
            state.escaped = true;
            bytes.extend_from_slice(&[escape, escape]);
        } else {
            bytes.push(byte);
            if byte == self.enclosure {
                state.in_quotes = false;
                state.just_closed = true;
            }
        }
    }
}

impl Iterator for CsvRowSource {
    type Item = RawRow;

    fn next(&mut self) -> Option<RawRow> {
        if self.finished {
            return None;
        }

        match self.read_row() {
            Ok(Some(row)) => Some(row),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(e) => {
                // 读取错误视为流结束
                error!(line = self.next_line, error = %e, "CSV 读取失败，停止读取后续行");
                self.finished = true;
                None
            }
        }
    }
}

/// 去掉结尾的 `\n` / `\r\n`
fn strip_line_end(bytes: &[u8]) -> &[u8] {
    let bytes = bytes.strip_suffix(b"\n").unwrap_or(bytes);
    bytes.strip_suffix(b"\r").unwrap_or(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp(content: &[u8]) -> NamedTempFile {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(content).unwrap();
        temp_file.flush().unwrap();
        temp_file
    }

    fn read_all(content: &[u8], dialect: &CsvDialect) -> Vec<RawRow> {
        let temp_file = write_temp(content);
        CsvRowSource::open(temp_file.path(), dialect).unwrap().collect()
    }

    fn cells(row: &RawRow) -> Vec<&str> {
        (0..row.len()).filter_map(|i| row.cell(i)).collect()
    }

    #[test]
    fn test_reads_rows_without_header() {
        let rows = read_all(b"0,a,b.html,c.html,RP\n1,d,e.html,f.html,\n", &CsvDialect::default());

        assert_eq!(rows.len(), 2);
        assert_eq!(cells(&rows[0]), vec!["0", "a", "b.html", "c.html", "RP"]);
        assert_eq!(rows[0].line(), 1);
        assert_eq!(rows[1].line(), 2);
        assert_eq!(rows[1].cell(4), Some(""));
        assert_eq!(rows[1].cell(5), None);
    }

    #[test]
    fn test_custom_delimiter_and_enclosure() {
        let dialect = CsvDialect {
            delimiter: b';',
            enclosure: b'\'',
            ..CsvDialect::default()
        };
        let rows = read_all(b"'a;b';c\n", &dialect);

        assert_eq!(cells(&rows[0]), vec!["a;b", "c"]);
    }

    #[test]
    fn test_escape_kept_inside_enclosure() {
        let rows = read_all(b"0,p,\"a\\\"b.html\",t,\n\"say \\\"hi\\\"\",x\n", &CsvDialect::default());

        assert_eq!(rows[0].cell(2), Some("a\\\"b.html"));
        assert_eq!(rows[0].cell(3), Some("t"));
        assert_eq!(cells(&rows[1]), vec!["say \\\"hi\\\"", "x"]);
    }

    #[test]
    fn test_escape_before_plain_byte_and_outside_enclosure() {
        let rows = read_all(b"\"a\\nb\",c\\d\n", &CsvDialect::default());

        assert_eq!(cells(&rows[0]), vec!["a\\nb", "c\\d"]);
    }

    #[test]
    fn test_doubled_enclosure() {
        let rows = read_all(b"\"a\"\"b\",c\n", &CsvDialect::default());

        assert_eq!(cells(&rows[0]), vec!["a\"b", "c"]);
    }

    #[test]
    fn test_quoted_newline_stays_in_one_row() {
        let rows = read_all(b"\"two\nlines\",x\nnext\n", &CsvDialect::default());

        assert_eq!(rows.len(), 2);
        assert_eq!(cells(&rows[0]), vec!["two\nlines", "x"]);
        assert_eq!(rows[1].line(), 3);
    }

    #[test]
    fn test_blank_lines_become_empty_rows() {
        let rows = read_all(b"\na,b\n\r\n\nc\n\n", &CsvDialect::default());

        let shapes: Vec<(u64, usize)> = rows.iter().map(|r| (r.line(), r.len())).collect();
        assert_eq!(shapes, vec![(1, 0), (2, 2), (3, 0), (4, 0), (5, 1), (6, 0)]);
        assert!(rows[0].is_empty());
    }

    #[test]
    fn test_last_line_without_newline() {
        let rows = read_all(b"a,b\nc,d", &CsvDialect::default());

        assert_eq!(rows.len(), 2);
        assert_eq!(cells(&rows[1]), vec!["c", "d"]);
    }

    #[test]
    fn test_crlf_line_endings() {
        let rows = read_all(b"a,b\r\nc,d\r\n", &CsvDialect::default());

        assert_eq!(cells(&rows[0]), vec!["a", "b"]);
        assert_eq!(cells(&rows[1]), vec!["c", "d"]);
    }

    #[test]
    fn test_flexible_row_lengths() {
        let rows = read_all(b"a\nb,c,d\n", &CsvDialect::default());

        assert_eq!(rows[0].len(), 1);
        assert_eq!(rows[1].len(), 3);
    }

    #[test]
    fn test_max_length_splits_long_line() {
        let dialect = CsvDialect {
            max_length: 10,
            ..CsvDialect::default()
        };
        let rows = read_all(b"0,p,aaaaaaaaaa.html,tttttttttt,RP\nnext\n", &dialect);

        let split: Vec<Vec<&str>> = rows.iter().map(cells).collect();
        assert_eq!(
            split,
            vec![
                vec!["0", "p", "aaaaaa"],
                vec!["aaaa.html", ""],
                vec!["tttttttttt"],
                vec!["", "RP"],
                vec!["next"],
            ]
        );
        // 切分出的各段属于同一物理行
        assert!(rows[..4].iter().all(|r| r.line() == 1));
        assert_eq!(rows[4].line(), 2);
    }

    #[test]
    fn test_max_length_does_not_split_inside_enclosure() {
        let dialect = CsvDialect {
            max_length: 5,
            ..CsvDialect::default()
        };
        let rows = read_all(b"\"abcdefghijkl\",x\nyz\n", &dialect);

        assert_eq!(cells(&rows[0]), vec!["abcdefghijkl", "x"]);
        assert_eq!(cells(&rows[1]), vec!["yz"]);
    }

    #[test]
    fn test_lossy_utf8() {
        let rows = read_all(b"ok,\xff\xfe\n", &CsvDialect::default());

        assert_eq!(rows[0].cell(0), Some("ok"));
        assert!(rows[0].cell(1).unwrap().contains('\u{FFFD}'));
    }

    #[test]
    fn test_empty_file_yields_nothing() {
        assert!(read_all(b"", &CsvDialect::default()).is_empty());
    }

    #[test]
    fn test_file_not_found() {
        let result = CsvRowSource::open(Path::new("non_existent.csv"), &CsvDialect::default());
        assert!(matches!(result, Err(ImportError::FileNotFound(_))));
    }
}
