use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde::Serialize;
use serde_json::ser::{Formatter, PrettyFormatter};

use crate::error::{Result, ValidationError, WebUiError};
use crate::models::ConfigDocument;

/// 最近一次加载或保存的结果，仅用于健康检查和启动日志
#[derive(Debug, Clone, Default)]
pub struct Mirror {
    pub exists: bool,
    pub document: Option<ConfigDocument>,
}

/// 读取失败的原因。两者对路由的意义相同，只在日志里区分
#[derive(Debug)]
enum LoadFailure {
    NotFound,
    Unreadable(std::io::Error),
    Malformed(json5::Error),
}

/// 存储引擎：磁盘上的 JSON5 配置文件 + 进程内镜像
pub struct ConfigStore {
    config_path: PathBuf,
    default_path: PathBuf,
    mirror: RwLock<Mirror>,
}

impl ConfigStore {
    pub fn new(config_path: impl Into<PathBuf>, default_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
            default_path: default_path.into(),
            mirror: RwLock::new(Mirror::default()),
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// 重新读取配置文件。成功时返回文档并刷新镜像，任何失败都只体现为 `None`
    pub async fn exists_and_load(&self) -> Option<ConfigDocument> {
        match read_document(&self.config_path).await {
            Ok(doc) => {
                self.update_mirror(true, Some(doc.clone()));
                Some(doc)
            }
            Err(failure) => {
                match failure {
                    LoadFailure::NotFound => {
                        tracing::debug!("配置文件不存在: {}", self.config_path.display());
                    }
                    LoadFailure::Unreadable(e) => {
                        tracing::warn!("无法读取配置文件 {}: {}", self.config_path.display(), e);
                    }
                    LoadFailure::Malformed(e) => {
                        tracing::warn!(
                            "配置文件 {} 解析失败，将进入初始设置流程（保存会覆盖该文件）: {}",
                            self.config_path.display(),
                            e
                        );
                    }
                }
                self.update_mirror(false, None);
                None
            }
        }
    }

    /// 读取随服务分发的默认模板
    pub async fn load_default(&self) -> Result<ConfigDocument> {
        read_document(&self.default_path)
            .await
            .map_err(|failure| {
                let reason = match failure {
                    LoadFailure::NotFound => "file not found".to_string(),
                    LoadFailure::Unreadable(e) => e.to_string(),
                    LoadFailure::Malformed(e) => e.to_string(),
                };
                WebUiError::DefaultTemplate(format!("{}: {}", self.default_path.display(), reason))
            })
    }

    /// 整体覆盖写入配置文件。写入独立的临时文件再原子替换，失败时原文件保持不变
    pub async fn save(&self, doc: &ConfigDocument) -> Result<()> {
        let text = to_json5_text(doc)?;

        // 写出的文本必须能被读回，否则保存后会被当成损坏的文件
        if let Err(e) = json5::from_str::<ConfigDocument>(&text) {
            return Err(ValidationError::Unstorable(e.to_string()).into());
        }

        let target = self.config_path.clone();
        tokio::task::spawn_blocking(move || write_atomically(&target, text.as_bytes()))
            .await
            .map_err(|e| WebUiError::Persistence(io::Error::new(io::ErrorKind::Other, e)))?
            .map_err(WebUiError::Persistence)?;

        self.update_mirror(true, Some(doc.clone()));
        Ok(())
    }

    pub fn mirror_exists(&self) -> bool {
        self.mirror().exists
    }

    pub fn mirror(&self) -> Mirror {
        match self.mirror.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn update_mirror(&self, exists: bool, document: Option<ConfigDocument>) {
        let mut guard = match self.mirror.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = Mirror { exists, document };
    }
}

async fn read_document(path: &Path) -> std::result::Result<ConfigDocument, LoadFailure> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Err(LoadFailure::NotFound),
        Err(e) => return Err(LoadFailure::Unreadable(e)),
    };
    json5::from_str::<ConfigDocument>(&content).map_err(LoadFailure::Malformed)
}

/// JSON 是 JSON5 的子集，直接输出 4 空格缩进的 JSON
fn to_json5_text(doc: &ConfigDocument) -> Result<String> {
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, Json5Formatter::new());
    doc.serialize(&mut ser)?;
    buf.push(b'\n');
    String::from_utf8(buf)
        .map_err(|e| WebUiError::Persistence(io::Error::new(io::ErrorKind::InvalidData, e)))
}

/// 临时文件与目标同目录，每次写入独立命名，`persist` 用 rename 替换目标
fn write_atomically(target: &Path, bytes: &[u8]) -> io::Result<()> {
    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    // 确保父目录存在
    std::fs::create_dir_all(dir)?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(target).map_err(|e| e.error)?;
    Ok(())
}

/// PrettyFormatter 之外额外转义 U+2028/U+2029，JSON5 不允许它们原样出现在字符串里
struct Json5Formatter {
    pretty: PrettyFormatter<'static>,
}

impl Json5Formatter {
    fn new() -> Self {
        Self {
            pretty: PrettyFormatter::with_indent(b"    "),
        }
    }
}

impl Formatter for Json5Formatter {
    fn begin_array<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.begin_array(writer)
    }

    fn end_array<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.end_array(writer)
    }

    fn begin_array_value<W: ?Sized + Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        self.pretty.begin_array_value(writer, first)
    }

    fn end_array_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.end_array_value(writer)
    }

    fn begin_object<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.begin_object(writer)
    }

    fn end_object<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.end_object(writer)
    }

    fn begin_object_key<W: ?Sized + Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        self.pretty.begin_object_key(writer, first)
    }

    fn begin_object_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.begin_object_value(writer)
    }

    fn end_object_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.end_object_value(writer)
    }

    fn write_string_fragment<W: ?Sized + Write>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()> {
        let mut start = 0;
        for (i, ch) in fragment.char_indices() {
            let escaped = match ch {
                '\u{2028}' => "\\u2028",
                '\u{2029}' => "\\u2029",
                _ => continue,
            };
            writer.write_all(fragment[start..i].as_bytes())?;
            writer.write_all(escaped.as_bytes())?;
            start = i + ch.len_utf8();
        }
        writer.write_all(fragment[start..].as_bytes())
    }
}
