use crate::ast;

use std::fmt::Write;

macro_rules! w {
    ($($tt:tt)*) => {
        drop(write!($($tt)*))
    };
}

pub(crate) fn emit(record: &ast::Record) -> String {
    let mut buf = String::new();

    w!(buf, "#[automatically_derived]\n");
    w!(buf, "impl ::flagenv::Config for {} {{\n", record.name);
    w!(
        buf,
        "    fn describe<'a>(&'a mut self, fields: &mut ::flagenv::Fields<'a, '_>) \
         -> ::core::result::Result<(), ::flagenv::Error> {{\n"
    );
    if record.fields.is_empty() {
        w!(buf, "        let _ = fields;\n");
    }
    for field in &record.fields {
        emit_field(&mut buf, field);
    }
    w!(buf, "        ::core::result::Result::Ok(())\n");
    w!(buf, "    }}\n");
    w!(buf, "}}\n");

    buf
}

fn emit_field(buf: &mut String, field: &ast::Field) {
    w!(buf, "        fields.field(::flagenv::FieldSpec::new({:?})", field.name());
    let attrs = &field.attrs;
    for (method, value) in
        [("flag", &attrs.flag), ("env", &attrs.env), ("help", &attrs.help), ("def", &attrs.def)]
    {
        if let Some(lit) = value {
            w!(buf, ".{method}({lit})");
        }
    }
    w!(buf, ", &mut self.{})?;\n", field.ident);
}
