use crate::areas::repository::Repository;
use crate::artifacts::objects::object::ObjectBox;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::Result;
use std::io::Write;

impl Repository {
    /// Print an object: blobs verbatim, trees one entry per line, commits as
    /// their text. With `show_type` only the object type is printed.
    pub fn cat_file(&self, object_id: &str, show_type: bool) -> Result<()> {
        let object_id = ObjectId::try_parse(object_id.to_string())?;

        if show_type {
            let (object_type, _) = self.database().get(&object_id)?;
            writeln!(self.writer(), "{object_type}")?;
            return Ok(());
        }

        match self.database().parse_object(&object_id)? {
            ObjectBox::Blob(blob) => self.writer().write_all(blob.content())?,
            object => {
                let display = object.display();
                if !display.is_empty() {
                    writeln!(self.writer(), "{display}")?;
                }
            }
        }

        Ok(())
    }
}
