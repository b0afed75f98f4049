use crate::model::SpriteSheet;
use std::fmt::Write;

/// Path-splitting mixins appended after the per-image rules. They let callers
/// write `.sprite("path/to/icon.png")` and have the directory and file name
/// split apart at compile time. Independent of the sheet contents.
pub const LESS_HELPERS: &str = concat!(
    ".sprite (@_) {\n",
    "\t@path: e(@_);\n",
    "\t@spriteDir: `\"@{path}\".match(/^(.*\\/)([^\\/]*)$/)[1]`;\n",
    "\t@imgName: `\"@{path}\".match(/^(.*\\/)([^\\/]*)$/)[2]`;\n",
    "\t.sprite(@imgName, @spriteDir);\n",
    "}\n",
    ".sprite('sprite-img', @_) {\n",
    "\t.sprite(\"sprite-img\", @_);\n",
    "}\n",
    ".sprite(\"sprite-img\", @_) {\n",
    "\t@path: e(@_);\n",
    "\t@spriteDir: `\"@{path}\".match(/^(.*\\/)([^\\/]*)$/)[1]`;\n",
    "\t@imgName: `\"@{path}\".match(/^(.*\\/)([^\\/]*)$/)[2]`;\n",
    "\t.sprite(\"sprite-img\", @imgName, @spriteDir);\n",
    "}\n",
);

/// Renders the LESS mixins for `sheet`.
///
/// Each placement yields a group-qualified mixin `.sprite(group, file, dir)`
/// and a short `.sprite(file, dir)` one, both pointing at the same offsets.
/// Output depends only on `sheet`, so unchanged inputs give identical bytes.
pub fn to_less(sheet: &SpriteSheet) -> String {
    let mut s = String::new();
    for p in &sheet.placements {
        // writing into a String cannot fail
        let _ = write!(
            s,
            ".sprite(\"{}\", \"{}\", @_spriteDir) {{\n\tbackground-image: url(\"@{{_spriteDir}}{}\");\n\tbackground-position: {}px {}px;\n}}\n",
            sheet.sprite_name, p.file_name, sheet.image_file, p.offset_x, p.offset_y,
        );
        let _ = write!(
            s,
            ".sprite(\"{}\", @_spriteDir) {{\n\tbackground-image: url(\"@{{_spriteDir}}{}\");\n\tbackground-position: {}px {}px;\n}}\n",
            p.file_name, sheet.image_file, p.offset_x, p.offset_y,
        );
    }
    s.push_str(LESS_HELPERS);
    s
}
