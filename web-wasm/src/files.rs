//! ブラウザのファイルハンドル

use futures::channel::oneshot;
use paper_rag_common::error::{Error, Result};
use paper_rag_common::upload::PickedFile;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use web_sys::{File, FileList, FileReader};

/// 選択・ドロップされたファイル
#[derive(Debug, Clone)]
pub struct WebFile(pub File);

impl PickedFile for WebFile {
    fn file_name(&self) -> String {
        self.0.name()
    }

    fn mime_type(&self) -> String {
        self.0.type_()
    }
}

pub fn from_file_list(files: &FileList) -> Vec<WebFile> {
    (0..files.length())
        .filter_map(|i| files.get(i))
        .map(WebFile)
        .collect()
}

/// data URLとして読み込む
pub async fn read_data_url(file: &File) -> Result<String> {
    let reader = FileReader::new().map_err(|e| Error::Io(std::io::Error::other(format!("{:?}", e))))?;
    let (tx, rx) = oneshot::channel::<Option<String>>();
    let tx = Rc::new(RefCell::new(Some(tx)));

    let on_load = {
        let tx = tx.clone();
        let reader = reader.clone();
        Closure::wrap(Box::new(move |_: web_sys::ProgressEvent| {
            let data_url = reader.result().ok().and_then(|r| r.as_string());
            if let Some(tx) = tx.borrow_mut().take() {
                let _ = tx.send(data_url);
            }
        }) as Box<dyn FnMut(_)>)
    };
    let on_error = Closure::wrap(Box::new(move |_: web_sys::ProgressEvent| {
        if let Some(tx) = tx.borrow_mut().take() {
            let _ = tx.send(None);
        }
    }) as Box<dyn FnMut(_)>);

    reader.set_onload(Some(on_load.as_ref().unchecked_ref()));
    reader.set_onerror(Some(on_error.as_ref().unchecked_ref()));
    reader
        .read_as_data_url(file)
        .map_err(|e| Error::Io(std::io::Error::other(format!("{:?}", e))))?;

    let result = rx.await.ok().flatten();
    reader.set_onload(None);
    reader.set_onerror(None);
    result.ok_or_else(|| Error::Io(std::io::Error::other(format!("failed to read {}", file.name()))))
}
