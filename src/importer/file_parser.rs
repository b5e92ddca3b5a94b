// ==========================================
// 员工管理系统 - 文件解析器实现
// ==========================================
// 阶段 0: 文件读取与解析
// 支持: CSV (.csv) / Excel (.xlsx，仅第一个工作表)
// 输出: 按源文件顺序的 RawRow 惰性序列（跳过表头与全空白行）
// ==========================================

use crate::domain::import::{RawRow, EXPECTED_COLUMNS};
use crate::importer::error::{ImportError, ImportResult};
use calamine::{Data, Range, Reader, Xlsx};
use chrono::NaiveTime;
use csv::{ReaderBuilder, Terminator};
use std::fs::File;
use std::io::{BufRead, BufReader, Cursor, Read, Seek, Split};
use std::path::Path;

// ==========================================
// FileFormat - 格式判别
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Xlsx,
}

impl FileFormat {
    /// 根据文件名后缀判别格式（忽略大小写）
    ///
    /// 其他后缀在进入导入引擎前即被拒绝
    pub fn from_file_name(file_name: &str) -> ImportResult<Self> {
        let ext = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "csv" => Ok(FileFormat::Csv),
            "xlsx" => Ok(FileFormat::Xlsx),
            "" => Err(ImportError::UnsupportedFormat(file_name.to_string())),
            _ => Err(ImportError::UnsupportedFormat(format!(".{}", ext))),
        }
    }
}

// ==========================================
// CSV Parser 实现
// ==========================================
// 按分隔符直接切分，不识别引号/转义（已知限制）
// 行号按物理行计数（LF / CRLF 均可），第 1 行固定为表头
pub struct CsvParser {
    delimiter: u8,
}

impl CsvParser {
    pub fn new(delimiter: u8) -> Self {
        Self { delimiter }
    }

    pub fn open<R: Read + Send + 'static>(&self, reader: R) -> RowSource {
        let reader: Box<dyn Read + Send> = Box::new(reader);

        // 每个物理行单独交给 csv 切分字段；'\r' 视为普通字符，行尾的由读取方剥离
        let mut builder = ReaderBuilder::new();
        builder
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .terminator(Terminator::Any(b'\n'))
            .delimiter(self.delimiter);

        RowSource::Delimited(DelimitedRows {
            lines: BufReader::new(reader).split(b'\n'),
            builder,
            line_number: 0,
        })
    }
}

impl Default for CsvParser {
    fn default() -> Self {
        Self::new(b',')
    }
}

pub struct DelimitedRows {
    lines: Split<BufReader<Box<dyn Read + Send>>>,
    builder: ReaderBuilder,
    line_number: usize,
}

impl DelimitedRows {
    /// 切分单行字段；空行返回空字段列表
    fn split_fields(&self, line: &[u8]) -> ImportResult<Vec<String>> {
        match self.builder.from_reader(line).into_records().next() {
            Some(record) => Ok(record?.iter().map(str::to_string).collect()),
            None => Ok(Vec::new()),
        }
    }
}

impl Iterator for DelimitedRows {
    type Item = ImportResult<RawRow>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let mut line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(e.into())),
            };
            self.line_number += 1;

            // 表头：只跳过第 1 个物理行
            if self.line_number == 1 {
                continue;
            }

            if line.last() == Some(&b'\r') {
                line.pop();
            }

            let fields = match self.split_fields(&line) {
                Ok(fields) => fields,
                Err(e) => return Some(Err(e)),
            };
            let row = RawRow::new(self.line_number, fields);

            // 跳过完全空白的行（仍计入行号）
            if row.is_blank() {
                continue;
            }

            return Some(Ok(row));
        }
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser;

impl ExcelParser {
    /// 打开工作簿并定位第一个工作表
    ///
    /// 容器损坏 / 无工作表 属于整次导入失败
    pub fn open<R: Read + Seek>(&self, reader: R) -> ImportResult<RowSource> {
        let mut workbook: Xlsx<R> = Xlsx::new(reader)?;

        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| ImportError::ExcelParseError("workbook has no worksheets".to_string()))??;

        // 以工作表报告的范围为界；第 1 行（索引 0）为表头
        let end_row = range.end().map(|(row, _)| row + 1).unwrap_or(0);

        Ok(RowSource::Spreadsheet(SpreadsheetRows {
            range,
            next_row: 1,
            end_row,
        }))
    }
}

pub struct SpreadsheetRows {
    range: Range<Data>,
    next_row: u32,
    end_row: u32,
}

impl Iterator for SpreadsheetRows {
    type Item = ImportResult<RawRow>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.next_row < self.end_row {
            let row_idx = self.next_row;
            self.next_row += 1;

            let fields = (0..EXPECTED_COLUMNS as u32)
                .map(|col| {
                    self.range
                        .get_value((row_idx, col))
                        .map(cell_text)
                        .unwrap_or_default()
                })
                .collect();
            let row = RawRow::new(row_idx as usize + 1, fields);

            if row.is_blank() {
                continue;
            }

            return Some(Ok(row));
        }

        None
    }
}

/// 单元格按显示文本取值
///
/// 日期单元格输出 YYYY-MM-DD（含非零时间时附带时间）
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => (if *b { "TRUE" } else { "FALSE" }).to_string(),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(ndt) if ndt.time() == NaiveTime::MIN => ndt.format("%Y-%m-%d").to_string(),
            Some(ndt) => ndt.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => dt.as_f64().to_string(),
        },
        Data::Error(e) => e.to_string(),
    }
}

// ==========================================
// RowSource - 单次遍历的原始行序列
// ==========================================
// 按格式标签分派，不同格式共享同一迭代接口
pub enum RowSource {
    Delimited(DelimitedRows),
    Spreadsheet(SpreadsheetRows),
}

impl RowSource {
    pub fn format(&self) -> FileFormat {
        match self {
            RowSource::Delimited(_) => FileFormat::Csv,
            RowSource::Spreadsheet(_) => FileFormat::Xlsx,
        }
    }
}

impl Iterator for RowSource {
    type Item = ImportResult<RawRow>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            RowSource::Delimited(rows) => rows.next(),
            RowSource::Spreadsheet(rows) => rows.next(),
        }
    }
}

// ==========================================
// 通用文件解析器（按格式判别选择）
// ==========================================
pub struct UniversalFileParser {
    csv_delimiter: u8,
}

impl UniversalFileParser {
    pub fn new(csv_delimiter: u8) -> Self {
        Self { csv_delimiter }
    }

    /// 从内存字节打开（上传场景）
    pub fn open_bytes(&self, bytes: Vec<u8>, format: FileFormat) -> ImportResult<RowSource> {
        match format {
            FileFormat::Csv => Ok(CsvParser::new(self.csv_delimiter).open(Cursor::new(bytes))),
            FileFormat::Xlsx => ExcelParser.open(Cursor::new(bytes)),
        }
    }

    /// 从文件路径打开，格式由后缀判别
    pub fn open_path<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<RowSource> {
        let path = file_path.as_ref();

        // 检查文件存在
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }

        let format = FileFormat::from_file_name(&path.to_string_lossy())?;
        let file = BufReader::new(File::open(path)?);

        match format {
            FileFormat::Csv => Ok(CsvParser::new(self.csv_delimiter).open(file)),
            FileFormat::Xlsx => ExcelParser.open(file),
        }
    }
}

impl Default for UniversalFileParser {
    fn default() -> Self {
        Self::new(b',')
    }
}
