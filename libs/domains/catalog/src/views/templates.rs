//! Page templates. Every template name is also usable as a partial.

pub const LAYOUT_HEADER: &str = r#"<!DOCTYPE html>
<html lang="es">
<head>
  <meta charset="utf-8">
  <title>{{titulo}}</title>
</head>
<body>
<nav>
  <a href="/listar">Productos</a> |
  <a href="/form">Crear producto</a> |
  <a href="/listar-datadriver">Lista diferida</a> |
  <a href="/listarchunked">Lista por bloques</a>
</nav>
<h1>{{titulo}}</h1>
{{#if success}}<div class="alert alert-success">{{success}}</div>{{/if}}
{{#if error}}<div class="alert alert-danger">{{error}}</div>{{/if}}
"#;

pub const LAYOUT_FOOTER: &str = r#"<footer>
  <small>Categorías:
  {{#each categorias}}{{nombre}}{{#unless @last}}, {{/unless}}{{/each}}</small>
</footer>
</body>
</html>
"#;

pub const LISTAR_HEAD: &str = r#"{{> layout_header}}
<table class="productos">
<thead>
  <tr><th>Foto</th><th>Nombre</th><th>Precio</th><th>Fecha</th><th>Categoría</th><th></th><th></th></tr>
</thead>
<tbody>
"#;

pub const LISTAR_TAIL: &str = r#"</tbody>
</table>
{{> layout_footer}}"#;

pub const PRODUCTO_FILA: &str = r#"<tr>
  <td>{{#if foto}}<img src="/uploads/img/{{foto}}" alt="{{nombre}}" width="48">{{/if}}</td>
  <td><a href="/ver/{{id}}">{{nombre}}</a></td>
  <td>{{precio}}</td>
  <td>{{fecha}}</td>
  <td>{{categoria.nombre}}</td>
  <td><a href="/form/{{id}}">editar</a></td>
  <td><a href="/eliminar/{{id}}" data-nombre="{{nombre}}" onclick="return confirm('¿Eliminar este producto?');">eliminar</a></td>
</tr>
"#;

pub const PRODUCTO_FILA_SIMPLE: &str = r#"<tr><td>{{nombre}}</td><td>{{precio}}</td><td>{{categoria.nombre}}</td></tr>
"#;

pub const LISTAR: &str = r#"{{> listar_head}}{{#each productos}}{{> producto_fila}}{{/each}}{{> listar_tail}}"#;

pub const LISTAR_CHUNKED: &str = r#"{{> listar_head}}{{#each productos}}{{> producto_fila_simple}}{{/each}}{{> listar_tail}}"#;

pub const FORM: &str = r#"{{> layout_header}}
<form action="/form" method="post" enctype="multipart/form-data">
  {{#if producto.id}}<input type="hidden" name="id" value="{{producto.id}}">{{/if}}
  {{#if producto.createAt}}<input type="hidden" name="createAt" value="{{producto.createAt}}">{{/if}}
  {{#if producto.foto}}<input type="hidden" name="foto" value="{{producto.foto}}">{{/if}}

  <div>
    <label for="nombre">Nombre</label>
    <input type="text" id="nombre" name="nombre" value="{{producto.nombre}}">
    {{#if errores.nombre}}<small class="error">{{errores.nombre}}</small>{{/if}}
  </div>

  <div>
    <label for="precio">Precio</label>
    <input type="number" step="any" id="precio" name="precio" value="{{producto.precio}}">
    {{#if errores.precio}}<small class="error">{{errores.precio}}</small>{{/if}}
  </div>

  <div>
    <label for="categoria_id">Categoría</label>
    <select id="categoria_id" name="categoria_id">
      <option value="">-- seleccionar --</option>
      {{#each categorias}}
      <option value="{{id}}"{{#if (eq id ../producto.categoria.id)}} selected{{/if}}>{{nombre}}</option>
      {{/each}}
    </select>
    {{#if errores.categoria_id}}<small class="error">{{errores.categoria_id}}</small>{{/if}}
  </div>

  <div>
    <label for="file">Foto</label>
    <input type="file" id="file" name="file">
    {{#if producto.foto}}<img src="/uploads/img/{{producto.foto}}" alt="{{producto.nombre}}" width="96">{{/if}}
  </div>

  <input type="submit" value="{{boton}}">
</form>
{{> layout_footer}}"#;

pub const VER: &str = r#"{{> layout_header}}
<div class="producto">
  {{#if producto.foto}}<img src="/uploads/img/{{producto.foto}}" alt="{{producto.nombre}}" width="240">{{/if}}
  <ul>
    <li>Id: {{producto.id}}</li>
    <li>Nombre: {{producto.nombre}}</li>
    <li>Precio: {{producto.precio}}</li>
    <li>Fecha: {{producto.fecha}}</li>
    <li>Categoría: {{producto.categoria.nombre}}</li>
  </ul>
  <a href="/form/{{producto.id}}">editar</a> |
  <a href="/listar">volver</a>
</div>
{{> layout_footer}}"#;
