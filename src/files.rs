//! ローカルファイルの読み込みと結果の保存

use crate::error::{MagicPixelsError, Result};
use magicpixels_common::uploader::UploaderConfig;
use magicpixels_common::UploadedFile;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// ファイルを読み込む
pub fn load_file(path: &Path) -> Result<UploadedFile> {
    if !path.is_file() {
        return Err(MagicPixelsError::FileNotFound(path.display().to_string()));
    }
    Ok(UploadedFile::from_path(path)?)
}

/// 引数のパスを読み込み、アップローダの条件で振り分ける
///
/// # Arguments
/// * `paths` - ファイルまたはフォルダ
/// * `uploader` - 受け付けるMIMEタイプとサイズ
///
/// # Returns
/// 受け付けたファイル（フォルダ内はファイル名順）。名前を指定したファイルが拒否された場合はエラー
pub fn load_inputs(paths: &[PathBuf], uploader: &UploaderConfig) -> Result<Vec<UploadedFile>> {
    accept_inputs(read_inputs(paths, uploader)?, uploader)
}

/// 引数のパスを読み込む。フォルダは直下の対応ファイルに展開する
///
/// 名前を指定したファイルは形式を問わずそのまま返す
pub fn read_inputs(paths: &[PathBuf], uploader: &UploaderConfig) -> Result<Vec<UploadedFile>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            let found = scan_folder(path, uploader)?;
            if found.is_empty() {
                return Err(MagicPixelsError::NoImagesFound(path.display().to_string()));
            }
            files.extend(found);
        } else {
            files.push(load_file(path)?);
        }
    }
    Ok(files)
}

/// 拒否されたファイルがあれば全件を列挙した検証エラーにする
pub fn accept_inputs(files: Vec<UploadedFile>, uploader: &UploaderConfig) -> Result<Vec<UploadedFile>> {
    let selection = uploader.accept(files);
    if let Some(message) = selection.rejection_message() {
        return Err(magicpixels_common::Error::validation(message).into());
    }
    Ok(selection.accepted)
}

/// フォルダ直下の対応ファイルを列挙
pub fn scan_folder(folder: &Path, uploader: &UploaderConfig) -> Result<Vec<UploadedFile>> {
    if !folder.exists() {
        return Err(MagicPixelsError::FolderNotFound(folder.display().to_string()));
    }

    let mut paths: Vec<PathBuf> = WalkDir::new(folder)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.into_path())
        .filter(|p| p.is_file())
        .filter(|p| {
            let name = p.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
            uploader.is_accepted_type(magicpixels_common::types::mime_from_file_name(&name))
        })
        .collect();
    paths.sort();

    paths.iter().map(|p| load_file(p)).collect()
}

/// 画像の寸法（縦横比固定のリサイズで使う）
pub fn image_dimensions(path: &Path) -> Option<(u32, u32)> {
    match image::image_dimensions(path) {
        Ok(dimensions) => Some(dimensions),
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "Could not read image dimensions");
            None
        }
    }
}

/// 保存先のパスを決める
///
/// `target` がディレクトリならその中に `file_name` で保存する
pub fn output_path(target: &Path, file_name: &str) -> PathBuf {
    if target.is_dir() {
        target.join(file_name)
    } else {
        target.to_path_buf()
    }
}

/// バイナリを書き出す（親ディレクトリは作成）
pub fn write_output(path: &Path, bytes: &[u8]) -> Result<()> {
    if bytes.is_empty() {
        return Err(MagicPixelsError::Download(
            magicpixels_common::preview::DOWNLOAD_EMPTY.to_string(),
        ));
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, bytes)?;
    Ok(())
}
